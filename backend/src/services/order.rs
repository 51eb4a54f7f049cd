//! Service order management
//!
//! Order creation and mutation plus the derived-totals calculation.
//! Totals are recomputed inside the same transaction as every plot,
//! dosage, or product change, so the stored values never drift from
//! their inputs.

use chrono::{DateTime, NaiveDate, Utc};
use geo::Area;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use shared::geometry::PlotGeometry;
use shared::models::{OrderStatus, ServiceOrder};
use shared::validation::validate_dosage;

use crate::error::{AppError, AppResult};
use crate::geoprocessing::units;

/// Service for managing service orders and their derived totals
#[derive(Clone)]
pub struct ServiceOrderService {
    db: PgPool,
}

/// Derived totals for a service order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTotals {
    pub planned_area_ha: Option<f64>,
    pub required_volume_liters: Option<f64>,
    pub estimated_cost: Option<Decimal>,
}

/// Input for creating a service order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub product_id: Uuid,
    pub aircraft_id: Uuid,
    pub planned_date: NaiveDate,
    pub pilot_name: Option<String>,
    pub dosage_liters_per_ha: f64,
    pub plot_ids: Vec<Uuid>,
}

/// Service order row
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    status: String,
    product_id: Uuid,
    aircraft_id: Uuid,
    planned_date: NaiveDate,
    pilot_name: Option<String>,
    dosage_liters_per_ha: f64,
    planned_area_ha: Option<f64>,
    required_volume_liters: Option<f64>,
    estimated_cost: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, plot_ids: Vec<Uuid>) -> AppResult<ServiceOrder> {
        let status = OrderStatus::from_str(&self.status)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

        Ok(ServiceOrder {
            id: self.id,
            status,
            plot_ids,
            product_id: self.product_id,
            aircraft_id: self.aircraft_id,
            planned_date: self.planned_date,
            pilot_name: self.pilot_name,
            dosage_liters_per_ha: self.dosage_liters_per_ha,
            planned_area_ha: self.planned_area_ha,
            required_volume_liters: self.required_volume_liters,
            estimated_cost: self.estimated_cost,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Compute the derived totals for a service order
///
/// The planned area is the sum of the individual plot areas, not their
/// union; overlapping plot boundaries are double-counted here while
/// reconciliation unions the same plots. Inherited behavior, kept as
/// observed. Each later value is only derived when its inputs are
/// positive: volume needs area and dosage, cost needs volume and a
/// product price. Flight-hour cost is excluded from the estimate.
/// Idempotent: same inputs, same totals.
pub fn compute_totals(
    plots: &[PlotGeometry],
    dosage_liters_per_ha: f64,
    cost_per_liter: Decimal,
) -> OrderTotals {
    let planned_area_ha: f64 = plots
        .iter()
        .map(|plot| units::to_hectares(plot.0.unsigned_area()))
        .sum();

    let required_volume_liters = if planned_area_ha > 0.0 && dosage_liters_per_ha > 0.0 {
        Some(planned_area_ha * dosage_liters_per_ha)
    } else {
        None
    };

    let estimated_cost = match required_volume_liters {
        Some(volume) if cost_per_liter > Decimal::ZERO => {
            Decimal::from_f64(volume).map(|v| v * cost_per_liter)
        }
        _ => None,
    };

    OrderTotals {
        planned_area_ha: Some(planned_area_ha),
        required_volume_liters,
        estimated_cost,
    }
}

impl ServiceOrderService {
    /// Create a new ServiceOrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a service order in the Planned state and compute its
    /// initial totals
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<ServiceOrder> {
        validate_dosage(input.dosage_liters_per_ha)
            .map_err(|message| AppError::validation("dosage_liters_per_ha", message))?;

        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO service_orders (status, product_id, aircraft_id, planned_date,
                                        pilot_name, dosage_liters_per_ha)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(OrderStatus::Planned.as_str())
        .bind(input.product_id)
        .bind(input.aircraft_id)
        .bind(input.planned_date)
        .bind(&input.pilot_name)
        .bind(input.dosage_liters_per_ha)
        .fetch_one(&mut *tx)
        .await?;

        assign_plots(&mut *tx, order_id, &input.plot_ids).await?;
        recompute_totals(&mut *tx, order_id).await?;

        tx.commit().await?;

        tracing::info!(%order_id, plots = input.plot_ids.len(), "service order created");
        self.get_order(order_id).await
    }

    /// Get a service order with its plot assignment
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<ServiceOrder> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, status, product_id, aircraft_id, planned_date, pilot_name,
                   dosage_liters_per_ha, planned_area_ha, required_volume_liters,
                   estimated_cost, created_at, updated_at
            FROM service_orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service order".to_string()))?;

        let plot_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT plot_id
            FROM service_order_plots
            WHERE service_order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        row.into_order(plot_ids)
    }

    /// Replace the order's plot assignment and recompute totals
    pub async fn set_plots(&self, order_id: Uuid, plot_ids: &[Uuid]) -> AppResult<ServiceOrder> {
        let mut tx = self.db.begin().await?;
        self.ensure_order_exists(&mut *tx, order_id).await?;

        sqlx::query("DELETE FROM service_order_plots WHERE service_order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        assign_plots(&mut *tx, order_id, plot_ids).await?;
        recompute_totals(&mut *tx, order_id).await?;

        tx.commit().await?;
        self.get_order(order_id).await
    }

    /// Change the recommended dosage and recompute totals
    pub async fn set_dosage(&self, order_id: Uuid, dosage_liters_per_ha: f64) -> AppResult<ServiceOrder> {
        validate_dosage(dosage_liters_per_ha)
            .map_err(|message| AppError::validation("dosage_liters_per_ha", message))?;

        let mut tx = self.db.begin().await?;
        self.ensure_order_exists(&mut *tx, order_id).await?;

        sqlx::query(
            "UPDATE service_orders SET dosage_liters_per_ha = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(order_id)
        .bind(dosage_liters_per_ha)
        .execute(&mut *tx)
        .await?;

        recompute_totals(&mut *tx, order_id).await?;

        tx.commit().await?;
        self.get_order(order_id).await
    }

    /// Change the product and recompute totals
    pub async fn set_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<ServiceOrder> {
        let mut tx = self.db.begin().await?;
        self.ensure_order_exists(&mut *tx, order_id).await?;

        let updated = sqlx::query(
            "UPDATE service_orders SET product_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Service order".to_string()));
        }

        recompute_totals(&mut *tx, order_id).await?;

        tx.commit().await?;
        self.get_order(order_id).await
    }

    async fn ensure_order_exists(&self, conn: &mut PgConnection, order_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM service_orders WHERE id = $1)",
        )
        .bind(order_id)
        .fetch_one(conn)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Service order".to_string()));
        }
        Ok(())
    }
}

/// Insert the order's plot assignment, preserving the given order
async fn assign_plots(conn: &mut PgConnection, order_id: Uuid, plot_ids: &[Uuid]) -> AppResult<()> {
    for (position, plot_id) in plot_ids.iter().enumerate() {
        let inserted = sqlx::query(
            r#"
            INSERT INTO service_order_plots (service_order_id, plot_id, position)
            SELECT $1, id, $3 FROM plots WHERE id = $2
            "#,
        )
        .bind(order_id)
        .bind(plot_id)
        .bind(position as i32)
        .execute(&mut *conn)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Plot {}", plot_id)));
        }
    }
    Ok(())
}

/// Recompute and persist the order's derived totals
///
/// Must run after every plot-assignment, dosage, or product change.
pub(crate) async fn recompute_totals(
    conn: &mut PgConnection,
    order_id: Uuid,
) -> AppResult<OrderTotals> {
    let plots: Vec<Json<PlotGeometry>> = sqlx::query_scalar(
        r#"
        SELECT p.geometry
        FROM service_order_plots sop
        JOIN plots p ON p.id = sop.plot_id
        WHERE sop.service_order_id = $1
        ORDER BY sop.position ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    let (dosage, cost_per_liter) = sqlx::query_as::<_, (f64, Decimal)>(
        r#"
        SELECT o.dosage_liters_per_ha, pr.cost_per_liter
        FROM service_orders o
        JOIN products pr ON pr.id = o.product_id
        WHERE o.id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Service order".to_string()))?;

    let geometries: Vec<PlotGeometry> = plots.into_iter().map(|json| json.0).collect();
    let totals = compute_totals(&geometries, dosage, cost_per_liter);

    sqlx::query(
        r#"
        UPDATE service_orders
        SET planned_area_ha = $2, required_volume_liters = $3, estimated_cost = $4,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(order_id)
    .bind(totals.planned_area_ha)
    .bind(totals.required_volume_liters)
    .bind(totals.estimated_cost)
    .execute(&mut *conn)
    .await?;

    Ok(totals)
}
