//! Flight path assembly

use geo_types::LineString;
use shared::geometry::FlightPath;

use super::track::FlightTrack;

/// Build the flight path polyline through the track's fixes
///
/// Points are trusted in log order; no reordering, deduplication, or
/// simplification. Total once the parser has guaranteed at least two
/// fixes.
pub fn build_flight_path(track: &FlightTrack) -> FlightPath {
    FlightPath(LineString::from(track.fixes().to_vec()))
}
