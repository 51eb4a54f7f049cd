//! Aircraft models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An application aircraft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Uuid,
    /// Unique registration prefix (e.g. PT-ABC)
    pub registration: String,
    pub model: String,
    /// Effective application swath width in meters, positive
    pub swath_width_meters: f64,
    pub cost_per_flight_hour: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
