//! Error handling for the Spray Operations Platform
//!
//! Every fatal pipeline failure surfaces as a single [`AppError`]
//! carrying a human-readable message; the calling collaborator maps
//! the stable [`AppError::code`] to its own transport (HTTP status,
//! queue nack, ...).

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    // Geoprocessing errors
    #[error("Track log contains only {found} usable fixes; at least 2 are required")]
    InsufficientTrackData { found: usize },

    #[error("Service order has no plots with geometry to reconcile against")]
    EmptyTargetArea,

    // Entity lookup errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Service order {order_id} already has a recorded application")]
    AlreadyReconciled { order_id: Uuid },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for collaborators
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InsufficientTrackData { .. } => "INSUFFICIENT_TRACK_DATA",
            AppError::EmptyTargetArea => "EMPTY_TARGET_AREA",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyReconciled { .. } => "ALREADY_RECONCILED",
            AppError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Serializable detail for the calling collaborator
    pub fn detail(&self) -> ErrorDetail {
        let field = match self {
            AppError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };

        ErrorDetail {
            code: self.code().to_string(),
            message: self.to_string(),
            field,
        }
    }

    /// Convenience constructor for validation failures
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
