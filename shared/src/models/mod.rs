//! Domain models for the Spray Operations Platform

mod aircraft;
mod application;
mod farm;
mod inventory;
mod plot;
mod product;
mod service_order;

pub use aircraft::*;
pub use application::*;
pub use farm::*;
pub use inventory::*;
pub use plot::*;
pub use product::*;
pub use service_order::*;
