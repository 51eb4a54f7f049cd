//! Shared types and models for the Spray Operations Platform
//!
//! This crate contains types shared between the backend and other
//! components of the system (mobile clients, reporting tools).

pub mod geometry;
pub mod models;
pub mod validation;

pub use geometry::*;
pub use models::*;
pub use validation::*;
