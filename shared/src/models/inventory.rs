//! Product inventory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock of a product held at a farm
///
/// Keyed by (product, farm). Created lazily on the first deduction for
/// the pair. The quantity may go negative; no floor is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStock {
    pub id: Uuid,
    pub product_id: Uuid,
    pub farm_id: Uuid,
    pub quantity_liters: f64,
    pub updated_at: DateTime<Utc>,
}
