//! # Error Types
//!
//! Structured error types for tally_core.
//!
//! Numeric anomalies (blank fields, junk text, zero denominators, missing
//! prices) never show up here: they are zeroed where they occur so that a
//! user never sees `NaN`. What remains are configuration and collaborator
//! failures, which the caller has to handle explicitly.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::errors::CalcError;
//!
//! let err = tally_core::compute("does-not-exist", &Default::default(), &Default::default())
//!     .unwrap_err();
//! assert_eq!(err.error_code(), "UNKNOWN_CALCULATOR_TYPE");
//! assert!(matches!(err, CalcError::UnknownCalculatorType { .. }));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tally_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for engine, settings and history operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// The requested calculator id is not in the registry
    #[error("Unknown calculator type: '{calculator_id}'")]
    UnknownCalculatorType { calculator_id: String },

    /// A settings value is invalid (out of range, wrong format, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// No stored calculation has the requested id
    #[error("Calculation not found in history: {id}")]
    HistoryNotFound { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// History file schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an UnknownCalculatorType error
    pub fn unknown_calculator(calculator_id: impl Into<String>) -> Self {
        CalcError::UnknownCalculatorType {
            calculator_id: calculator_id.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a HistoryNotFound error
    pub fn history_not_found(id: impl ToString) -> Self {
        CalcError::HistoryNotFound { id: id.to_string() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl ToString) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::UnknownCalculatorType { .. } => "UNKNOWN_CALCULATOR_TYPE",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::HistoryNotFound { .. } => "HISTORY_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
