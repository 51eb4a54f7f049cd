//! Covered-area derivation
//!
//! Expands the flight path by half the aircraft's swath width to get
//! the polygon of ground actually treated. The buffer is built as the
//! union of one rectangle per path segment plus a disk at every fix,
//! which is a round-cap, round-join polyline buffer.

use geo::BooleanOps;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use shared::geometry::{CoveredArea, FlightPath};
use shared::validation::validate_swath_width;

use super::units;
use crate::error::{AppError, AppResult};

/// Vertices used to approximate each circular cap
const CAP_SEGMENTS: usize = 32;

/// Compute the covered-area polygon for a flight path
///
/// The swath width must be positive. A path of coincident fixes still
/// produces a non-empty polygon (the cap disk).
pub fn covered_area(path: &FlightPath, swath_width_meters: f64) -> AppResult<CoveredArea> {
    validate_swath_width(swath_width_meters)
        .map_err(|message| AppError::validation("swath_width_meters", message))?;

    let radius = units::swath_radius_degrees(swath_width_meters);
    Ok(CoveredArea(buffer_polyline(&path.0, radius)))
}

fn buffer_polyline(line: &LineString<f64>, radius: f64) -> MultiPolygon<f64> {
    let mut parts: Vec<Polygon<f64>> = line.0.iter().map(|c| cap_disk(*c, radius)).collect();

    for segment in line.0.windows(2) {
        if let Some(rectangle) = segment_rectangle(segment[0], segment[1], radius) {
            parts.push(rectangle);
        }
    }

    union_all(
        parts
            .into_iter()
            .map(|polygon| MultiPolygon::new(vec![polygon]))
            .collect(),
    )
}

/// Union in balanced rounds; a left fold re-unions the whole
/// accumulated result once per part, which is quadratic in the number
/// of fixes and crawls on long logs.
fn union_all(mut parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while parts.len() > 1 {
        let mut merged = Vec::with_capacity(parts.len() / 2 + 1);
        let mut pairs = parts.into_iter();
        while let Some(first) = pairs.next() {
            match pairs.next() {
                Some(second) => merged.push(first.union(&second)),
                None => merged.push(first),
            }
        }
        parts = merged;
    }

    parts
        .into_iter()
        .next()
        .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

fn cap_disk(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let ring: Vec<Coord<f64>> = (0..CAP_SEGMENTS)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (CAP_SEGMENTS as f64);
            Coord {
                x: center.x + radius * theta.cos(),
                y: center.y + radius * theta.sin(),
            }
        })
        .collect();

    Polygon::new(LineString::from(ring), Vec::new())
}

/// Rectangle covering one path segment, expanded by `radius` on both
/// sides. `None` for zero-length segments; their caps already cover
/// the spot.
fn segment_rectangle(start: Coord<f64>, end: Coord<f64>, radius: f64) -> Option<Polygon<f64>> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return None;
    }

    // Unit normal scaled to the buffer radius
    let nx = -dy / length * radius;
    let ny = dx / length * radius;

    Some(Polygon::new(
        LineString::from(vec![
            Coord { x: start.x + nx, y: start.y + ny },
            Coord { x: end.x + nx, y: end.y + ny },
            Coord { x: end.x - nx, y: end.y - ny },
            Coord { x: start.x - nx, y: start.y - ny },
        ]),
        Vec::new(),
    ))
}
