//! Planned target aggregation

use geo::{Area, BooleanOps};
use geo_types::MultiPolygon;
use shared::geometry::PlotGeometry;

use crate::error::{AppError, AppResult};

/// Merge the geometries of all plots assigned to an order into one
/// planned-target area
///
/// Fails with `EmptyTargetArea` when no plots are assigned or when
/// their union is geometrically empty; reconciliation cannot proceed
/// without a target.
pub fn aggregate_target(plots: &[PlotGeometry]) -> AppResult<MultiPolygon<f64>> {
    let mut union: Option<MultiPolygon<f64>> = None;

    for plot in plots {
        let polygon = MultiPolygon::new(vec![plot.0.clone()]);
        union = Some(match union {
            Some(merged) => merged.union(&polygon),
            None => polygon,
        });
    }

    let target = union.ok_or(AppError::EmptyTargetArea)?;
    if target.0.is_empty() || target.unsigned_area() == 0.0 {
        return Err(AppError::EmptyTargetArea);
    }

    Ok(target)
}
