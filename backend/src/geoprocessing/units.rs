//! Unit conversions for geographic-degree geometry
//!
//! Buffers and areas are computed directly on lon/lat degrees. One
//! degree of latitude is taken as 111 km, and square units divide by
//! 10,000 to give hectares as if they were square meters. Both are
//! rough planar approximations that degrade away from the equator;
//! they are kept for behavioral compatibility. A projected-CRS
//! implementation would replace only this module.

/// Approximate meters per degree of latitude
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Square units per hectare under the planar assumption
pub const SQUARE_UNITS_PER_HECTARE: f64 = 10_000.0;

/// Buffer radius in degrees for an application swath width in meters
///
/// Half the swath width, converted with the fixed meters-per-degree
/// factor.
pub fn swath_radius_degrees(swath_width_meters: f64) -> f64 {
    (swath_width_meters / METERS_PER_DEGREE) / 2.0
}

/// Convert an area in square units to hectares
pub fn to_hectares(area_square_units: f64) -> f64 {
    area_square_units / SQUARE_UNITS_PER_HECTARE
}
