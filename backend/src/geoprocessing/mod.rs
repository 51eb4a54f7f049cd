//! Flight-log geoprocessing pipeline
//!
//! Raw track log text -> validated fix sequence -> flight path ->
//! covered-area polygon -> coverage metrics against the planned
//! target. Every step is pure and synchronous; persistence and side
//! effects live in [`crate::services`].
//!
//! All geometry is computed directly in geographic degrees (WGS84
//! lon/lat). That planar approximation is inherited behavior; the
//! conversion constants are isolated in [`units`] so a projected-CRS
//! implementation can replace them without touching reconciliation.

pub mod coverage;
pub mod path;
pub mod reconcile;
pub mod target;
pub mod track;
pub mod units;

use shared::geometry::{CoveredArea, FlightPath, PlotGeometry};
use shared::models::CoverageMetrics;

use crate::error::AppResult;

/// Everything derived from one flight log during a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconciledFlight {
    pub flight_path: FlightPath,
    pub covered_area: CoveredArea,
    pub metrics: CoverageMetrics,
}

/// Run the full pipeline over one raw track log
///
/// Fails with `InsufficientTrackData` when the log holds fewer than 2
/// usable fixes, and `EmptyTargetArea` when the order's plots union to
/// nothing. Pure: identical inputs always yield identical output.
pub fn reconcile_flight(
    raw_log: &str,
    swath_width_meters: f64,
    plots: &[PlotGeometry],
) -> AppResult<ReconciledFlight> {
    let track = track::parse_track_log(raw_log)?;
    let flight_path = path::build_flight_path(&track);
    let covered_area = coverage::covered_area(&flight_path, swath_width_meters)?;
    let target = target::aggregate_target(plots)?;
    let metrics = reconcile::reconcile(&covered_area, &target);

    Ok(ReconciledFlight {
        flight_path,
        covered_area,
        metrics,
    })
}
