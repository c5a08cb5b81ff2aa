//! # Error Types
//!
//! Structured error types for scale_core. Calibration itself never fails
//! with an error (a failed calibration is a normal result), so these errors
//! surface only from input validation, configuration, file I/O, and the
//! internals of a single estimator (where they are caught and logged).
//!
//! ## Example
//!
//! ```rust
//! use scale_core::errors::{CalibError, CalibResult};
//!
//! fn validate_scale(scale_factor: f64) -> CalibResult<()> {
//!     if scale_factor <= 0.0 {
//!         return Err(CalibError::InvalidInput {
//!             field: "scale_factor".to_string(),
//!             value: scale_factor.to_string(),
//!             reason: "Scale factor must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for scale_core operations
pub type CalibResult<T> = Result<T, CalibError>;

/// Structured error type for calibration operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalibError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Label has no entry in the standard component tables
    #[error("Component not found: {label}")]
    ComponentNotFound { label: String },

    /// An estimator could not produce a usable statistic
    #[error("Estimation failed: {method} - {reason}")]
    EstimationFailed { method: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalibError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalibError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalibError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ComponentNotFound error
    pub fn component_not_found(label: impl Into<String>) -> Self {
        CalibError::ComponentNotFound {
            label: label.into(),
        }
    }

    /// Create an EstimationFailed error
    pub fn estimation_failed(method: impl Into<String>, reason: impl Into<String>) -> Self {
        CalibError::EstimationFailed {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalibError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalibError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (the caller can fix the input and retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalibError::InvalidInput { .. } | CalibError::MissingField { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalibError::InvalidInput { .. } => "INVALID_INPUT",
            CalibError::MissingField { .. } => "MISSING_FIELD",
            CalibError::ComponentNotFound { .. } => "COMPONENT_NOT_FOUND",
            CalibError::EstimationFailed { .. } => "ESTIMATION_FAILED",
            CalibError::FileError { .. } => "FILE_ERROR",
            CalibError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalibError {
    fn from(e: serde_json::Error) -> Self {
        CalibError::serialization(e.to_string())
    }
}
