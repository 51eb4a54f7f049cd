//! Geometry interchange types
//!
//! All geometries are geographic (WGS84 longitude/latitude degrees) and
//! serialize as GeoJSON, both in API payloads and in `jsonb` columns.
//! Coordinate order is always (x, y) = (lon, lat).

use geo_types::{LineString, MultiPolygon, Polygon};
use geojson::Geometry;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// The polygon boundary of a single plot
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGeometry(pub Polygon<f64>);

/// The flown route extracted from a track log, in log order
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPath(pub LineString<f64>);

/// The ground area effectively treated (route expanded by half the
/// swath width)
#[derive(Debug, Clone, PartialEq)]
pub struct CoveredArea(pub MultiPolygon<f64>);

macro_rules! geojson_serde {
    ($wrapper:ident, $geometry:ty) => {
        impl Serialize for $wrapper {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                Geometry::new(geojson::Value::from(&self.0)).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $wrapper {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let geometry = Geometry::deserialize(deserializer)?;
                <$geometry>::try_from(geometry.value)
                    .map($wrapper)
                    .map_err(D::Error::custom)
            }
        }

        impl From<$geometry> for $wrapper {
            fn from(geometry: $geometry) -> Self {
                Self(geometry)
            }
        }
    };
}

geojson_serde!(PlotGeometry, Polygon<f64>);
geojson_serde!(FlightPath, LineString<f64>);
geojson_serde!(CoveredArea, MultiPolygon<f64>);

impl PlotGeometry {
    /// Number of distinct vertices in the exterior ring
    pub fn exterior_vertex_count(&self) -> usize {
        let ring = &self.0.exterior().0;
        // A closed ring repeats its first coordinate at the end
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.len() - 1
        } else {
            ring.len()
        }
    }
}
