//! Application recording and flight-log reconciliation
//!
//! Orchestrates the geoprocessing pipeline and the side effects that
//! follow its first successful persistence. Everything happens in one
//! transaction: the application insert, the inventory deduction, and
//! the order-completion transition either all commit or none do. The
//! single-fire guarantee is the unique key on
//! `applications.service_order_id`, not a storage write hook.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use shared::geometry::{CoveredArea, FlightPath, PlotGeometry};
use shared::models::{Application, CoverageMetrics, OrderStatus};

use crate::error::{AppError, AppResult};
use crate::geoprocessing;
use crate::services::inventory::InventoryLedger;

/// Service for recording executed applications
#[derive(Clone)]
pub struct ApplicationService {
    db: PgPool,
}

/// Order context needed to run one reconciliation
#[derive(Debug, sqlx::FromRow)]
struct OrderContextRow {
    status: String,
    product_id: Uuid,
    required_volume_liters: Option<f64>,
    swath_width_meters: f64,
}

/// Application row
#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    service_order_id: Uuid,
    log_url: String,
    flight_path: Json<FlightPath>,
    covered_area: Json<CoveredArea>,
    correct_area_ha: f64,
    waste_area_ha: f64,
    failure_area_ha: f64,
    overlap_area_ha: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Application {
            id: row.id,
            service_order_id: row.service_order_id,
            log_url: row.log_url,
            flight_path: row.flight_path.0,
            covered_area: row.covered_area.0,
            metrics: CoverageMetrics {
                correct_area_ha: row.correct_area_ha,
                waste_area_ha: row.waste_area_ha,
                failure_area_ha: row.failure_area_ha,
                overlap_area_ha: row.overlap_area_ha,
            },
            created_at: row.created_at,
        }
    }
}

impl ApplicationService {
    /// Create a new ApplicationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Reconcile a raw flight log against an order's planned target
    /// and persist the resulting application
    ///
    /// Fatal errors abort before any side effect is visible. A second
    /// call for the same order fails with `AlreadyReconciled` and
    /// leaves stock and order status untouched.
    pub async fn process_flight_log(
        &self,
        order_id: Uuid,
        raw_log: &str,
        log_url: &str,
    ) -> AppResult<Application> {
        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, OrderContextRow>(
            r#"
            SELECT o.status, o.product_id, o.required_volume_liters,
                   a.swath_width_meters
            FROM service_orders o
            JOIN aircraft a ON a.id = o.aircraft_id
            WHERE o.id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Service order".to_string()))?;

        let status = OrderStatus::from_str(&order.status)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        match status {
            OrderStatus::Completed => {
                return Err(AppError::AlreadyReconciled { order_id });
            }
            OrderStatus::Cancelled => {
                return Err(AppError::InvalidStateTransition(
                    "cancelled orders cannot receive an application".to_string(),
                ));
            }
            OrderStatus::Planned | OrderStatus::InProgress => {}
        }

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
        .fetch_all(&mut *tx)
        .await?;
        let geometries: Vec<PlotGeometry> = plots.into_iter().map(|json| json.0).collect();

        let flight = geoprocessing::reconcile_flight(raw_log, order.swath_width_meters, &geometries)?;

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (service_order_id, log_url, flight_path, covered_area,
                                      correct_area_ha, waste_area_ha, failure_area_ha,
                                      overlap_area_ha)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (service_order_id) DO NOTHING
            RETURNING id, service_order_id, log_url, flight_path, covered_area,
                      correct_area_ha, waste_area_ha, failure_area_ha, overlap_area_ha,
                      created_at
            "#,
        )
        .bind(order_id)
        .bind(log_url)
        .bind(Json(&flight.flight_path))
        .bind(Json(&flight.covered_area))
        .bind(flight.metrics.correct_area_ha)
        .bind(flight.metrics.waste_area_ha)
        .bind(flight.metrics.failure_area_ha)
        .bind(flight.metrics.overlap_area_ha)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::AlreadyReconciled { order_id })?;

        InventoryLedger::settle_order(
            &mut *tx,
            order_id,
            order.product_id,
            order.required_volume_liters,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            %order_id,
            correct_ha = row.correct_area_ha,
            waste_ha = row.waste_area_ha,
            failure_ha = row.failure_area_ha,
            "flight log reconciled"
        );

        Ok(row.into())
    }

    /// Get the recorded application for a service order
    pub async fn get_application(&self, order_id: Uuid) -> AppResult<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, service_order_id, log_url, flight_path, covered_area,
                   correct_area_ha, waste_area_ha, failure_area_ha, overlap_area_ha,
                   created_at
            FROM applications
            WHERE service_order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application".to_string()))?;

        Ok(row.into())
    }
}
