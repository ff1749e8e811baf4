//! # Error Types
//!
//! Structured error types for radiant_core. Only a handful of conditions are
//! hard failures: missing circuit geometry, malformed inputs, and lookups of
//! circuits that do not exist in a project. Numeric edge cases (degenerate
//! LMTD, friction-factor domain errors, table misses) are handled inside the
//! solver and never reach this type.
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::errors::{CalcError, CalcResult};
//!
//! fn validate_area(area_m2: f64) -> CalcResult<()> {
//!     if !(area_m2 > 0.0) {
//!         return Err(CalcError::missing_geometry("area_m2", area_m2.to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_area(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for radiant_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for solver operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Mandatory circuit geometry is absent or non-positive
    #[error("Missing circuit geometry: '{field}' is {value}, must be positive")]
    MissingGeometry { field: String, value: String },

    /// No circuit with this id exists in the project
    #[error("Circuit not found: {id}")]
    CircuitNotFound { id: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingGeometry error
    pub fn missing_geometry(field: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::MissingGeometry {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a CircuitNotFound error
    pub fn circuit_not_found(id: impl ToString) -> Self {
        CalcError::CircuitNotFound { id: id.to_string() }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Whether the error comes from the circuit data itself (the user can fix it in the form)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingGeometry { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingGeometry { .. } => "MISSING_GEOMETRY",
            CalcError::CircuitNotFound { .. } => "CIRCUIT_NOT_FOUND",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}
