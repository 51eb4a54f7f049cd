//! Executed application models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{CoveredArea, FlightPath};

/// Area metrics produced by reconciling covered area against the
/// planned target, all in hectares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// Covered ∩ target
    pub correct_area_ha: f64,
    /// Covered − target
    pub waste_area_ha: f64,
    /// Target − covered
    pub failure_area_ha: f64,
    /// Internal double coverage. Not computed by this version; `None`
    /// means "not measured", which is distinct from a measured zero.
    pub overlap_area_ha: Option<f64>,
}

/// The recorded execution of a service order
///
/// One-to-one with its service order. Created once, during the single
/// reconciliation run that produces it; the first successful
/// persistence triggers inventory deduction and order completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub service_order_id: Uuid,
    /// Location of the raw track log in external storage
    pub log_url: String,
    pub flight_path: FlightPath,
    pub covered_area: CoveredArea,
    pub metrics: CoverageMetrics,
    pub created_at: DateTime<Utc>,
}
