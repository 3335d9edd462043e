//! Custom error types for the expense reporter
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Not every variant is fatal. `IncompleteSelector` is an expected state while
//! a custom range is being picked, and `MalformedAmount` is absorbed by the
//! aggregator (the record is skipped). The boundary errors, `FetchFailed` and
//! `ExportFailed`, are the ones meant to reach the user.

use thiserror::Error;

/// The main error type for expense reporter operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// A custom period selector is missing one or both bounds
    #[error("Custom period is incomplete: both a start and an end date are required")]
    IncompleteSelector,

    /// A record's amount could not be parsed
    #[error("Malformed amount '{value}' on expense {id}")]
    MalformedAmount { id: String, value: String },

    /// An export was requested with nothing to export
    #[error("No expenses to export for the selected period")]
    EmptyDataset,

    /// The expense source could not deliver data
    #[error("Failed to fetch expenses: {0}")]
    FetchFailed(String),

    /// Rendering or delivering an export failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReportError {
    /// Create a malformed amount error for a record
    pub fn malformed_amount(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedAmount {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Check if this is the "custom period not fully chosen yet" signal
    pub fn is_incomplete_selector(&self) -> bool {
        matches!(self, Self::IncompleteSelector)
    }

    /// Check if this is an empty-dataset notice
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Errors that should be shown to the user as a failure.
    ///
    /// `IncompleteSelector` and `EmptyDataset` are notices, not failures.
    pub fn is_user_facing_failure(&self) -> bool {
        !matches!(self, Self::IncompleteSelector | Self::EmptyDataset)
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::ExportFailed(err.to_string())
    }
}

/// Result type alias for expense reporter operations
pub type ReportResult<T> = Result<T, ReportError>;
