//! Service order models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a service order
///
/// Orders are created `Planned`. The transition to `Completed` happens
/// only as a side effect of the order's application being recorded for
/// the first time. `Cancelled` is a terminal manual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Planned => "planned",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether an application may still be recorded against the order
    pub fn can_record_application(&self) -> bool {
        matches!(self, OrderStatus::Planned | OrderStatus::InProgress)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(OrderStatus::Planned),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A planned aerial application job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub status: OrderStatus,
    pub plot_ids: Vec<Uuid>,
    pub product_id: Uuid,
    pub aircraft_id: Uuid,
    pub planned_date: NaiveDate,
    pub pilot_name: Option<String>,
    /// Recommended dosage in liters per hectare, positive
    pub dosage_liters_per_ha: f64,
    /// Derived totals, recomputed on every plot/dosage/product change
    pub planned_area_ha: Option<f64>,
    pub required_volume_liters: Option<f64>,
    pub estimated_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
