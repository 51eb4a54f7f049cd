//! Farm plot models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::PlotGeometry;

/// A planting area within a farm
///
/// The plot area is always derived from the geometry, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub name: String,
    pub planted_crop: Option<String>,
    /// Single simple polygon, WGS84 lon/lat
    pub geometry: PlotGeometry,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
