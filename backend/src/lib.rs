//! Spray Operations Platform - Backend Core
//!
//! Flight-log geoprocessing and reconciliation for aerial application
//! service orders: parsing raw GPS track logs, deriving the covered
//! swath polygon, comparing it against the planned target area, and
//! applying the inventory and order-status side effects that follow.
//!
//! The HTTP layer, authentication and report rendering live in a
//! separate collaborator that calls into this crate.

pub mod config;
pub mod db;
pub mod error;
pub mod geoprocessing;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, AppResult};
