//! Coverage reconciliation
//!
//! Polygon set operations between the covered area and the planned
//! target, converted to hectares.

use geo::{Area, BooleanOps};
use geo_types::MultiPolygon;
use shared::geometry::CoveredArea;
use shared::models::CoverageMetrics;

use super::units;

/// Compute correct, waste, and failure areas
///
/// - correct = covered ∩ target
/// - waste   = covered − target
/// - failure = target − covered
///
/// Empty results yield 0, not an error. Overlap (double coverage
/// within the flight path) is not computed by this version and is
/// reported as `None` rather than a fabricated zero. Pure function:
/// re-running on the same geometries yields identical metrics.
pub fn reconcile(covered: &CoveredArea, target: &MultiPolygon<f64>) -> CoverageMetrics {
    let correct = covered.0.intersection(target);
    let waste = covered.0.difference(target);
    let failure = target.difference(&covered.0);

    CoverageMetrics {
        correct_area_ha: units::to_hectares(correct.unsigned_area()),
        waste_area_ha: units::to_hectares(waste.unsigned_area()),
        failure_area_ha: units::to_hectares(failure.unsigned_area()),
        overlap_area_ha: None,
    }
}
