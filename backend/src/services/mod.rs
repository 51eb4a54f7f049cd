//! Business logic services for the Spray Operations Platform

pub mod application;
pub mod inventory;
pub mod order;

pub use application::ApplicationService;
pub use inventory::InventoryLedger;
pub use order::ServiceOrderService;
