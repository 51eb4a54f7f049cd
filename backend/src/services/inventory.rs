//! Inventory ledger for product stock held at farms
//!
//! The settlement step runs exactly once per service order, inside the
//! transaction that first persists the order's application. Stock rows
//! are created lazily per (product, farm) pair, and the deduction is a
//! single SQL read-modify-write so concurrent settlements for the same
//! pair never lose an update. Quantities have no lower bound and may
//! go negative.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use shared::models::{InventoryStock, OrderStatus};

use crate::error::AppResult;

/// Ledger over the (product, farm) stock table
#[derive(Clone)]
pub struct InventoryLedger {
    db: PgPool,
}

/// Stock row
#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: Uuid,
    product_id: Uuid,
    farm_id: Uuid,
    quantity_liters: f64,
    updated_at: DateTime<Utc>,
}

impl From<StockRow> for InventoryStock {
    fn from(row: StockRow) -> Self {
        InventoryStock {
            id: row.id,
            product_id: row.product_id,
            farm_id: row.farm_id,
            quantity_liters: row.quantity_liters,
            updated_at: row.updated_at,
        }
    }
}

impl InventoryLedger {
    /// Create a new InventoryLedger instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply the one-time side effects of recording an application
    ///
    /// Runs inside the caller's transaction, after the application row
    /// has been inserted. Deducts the order's required volume from the
    /// primary farm's stock when the volume is known and positive,
    /// then transitions the order to Completed unconditionally.
    pub async fn settle_order(
        conn: &mut PgConnection,
        order_id: Uuid,
        product_id: Uuid,
        required_volume_liters: Option<f64>,
    ) -> AppResult<()> {
        let volume = required_volume_liters.unwrap_or(0.0);

        if volume > 0.0 {
            if let Some(farm_id) = primary_farm_of(&mut *conn, order_id).await? {
                deduct(&mut *conn, product_id, farm_id, volume).await?;
                tracing::info!(%order_id, %product_id, %farm_id, volume, "stock deducted");
            }
        }

        // Completion does not depend on whether a deduction occurred
        sqlx::query("UPDATE service_orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(order_id)
            .bind(OrderStatus::Completed.as_str())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Current stock for a (product, farm) pair, if a row exists
    pub async fn stock_level(
        &self,
        product_id: Uuid,
        farm_id: Uuid,
    ) -> AppResult<Option<InventoryStock>> {
        let row = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT id, product_id, farm_id, quantity_liters, updated_at
            FROM inventory_stocks
            WHERE product_id = $1 AND farm_id = $2
            "#,
        )
        .bind(product_id)
        .bind(farm_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(InventoryStock::from))
    }

    /// All stock rows for a farm
    pub async fn farm_stocks(&self, farm_id: Uuid) -> AppResult<Vec<InventoryStock>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT id, product_id, farm_id, quantity_liters, updated_at
            FROM inventory_stocks
            WHERE farm_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(farm_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryStock::from).collect())
    }
}

/// The farm charged for an order's consumption: the farm of the first
/// assigned plot
///
/// Orders are treated as single-farm for inventory purposes even
/// though the data model permits mixed-farm plot sets.
async fn primary_farm_of(conn: &mut PgConnection, order_id: Uuid) -> AppResult<Option<Uuid>> {
    let farm_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT p.farm_id
        FROM service_order_plots sop
        JOIN plots p ON p.id = sop.plot_id
        WHERE sop.service_order_id = $1
        ORDER BY sop.position ASC
        LIMIT 1
        "#,
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(farm_id)
}

/// Lazily create the stock row, then subtract atomically
async fn deduct(
    conn: &mut PgConnection,
    product_id: Uuid,
    farm_id: Uuid,
    volume_liters: f64,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_stocks (product_id, farm_id, quantity_liters)
        VALUES ($1, $2, 0)
        ON CONFLICT (product_id, farm_id) DO NOTHING
        "#,
    )
    .bind(product_id)
    .bind(farm_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        UPDATE inventory_stocks
        SET quantity_liters = quantity_liters - $3, updated_at = NOW()
        WHERE product_id = $1 AND farm_id = $2
        "#,
    )
    .bind(product_id)
    .bind(farm_id)
    .bind(volume_liters)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
