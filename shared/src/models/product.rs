//! Chemical product models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chemical product applied during spray operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    /// Unique commercial name
    pub name: String,
    pub active_ingredient: Option<String>,
    /// Cost per liter, non-negative
    pub cost_per_liter: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
