//! Custom error types for WealthFlow
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for WealthFlow operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backing store could not be reached or refused access
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The account has no partition in the store yet
    #[error("Partition not found: {0}")]
    PartitionNotFound(String),

    /// A record failed validation; nothing was written
    #[error("Invalid record{}: {reason}", row_suffix(.row))]
    InvalidRecord { row: Option<usize>, reason: String },

    /// The partition changed since it was loaded
    #[error("Ledger '{account}' was modified concurrently (expected revision {expected}, found {actual})")]
    Conflict {
        account: String,
        expected: String,
        actual: String,
    },

    /// Login identifier is not registered in the account directory
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV encoding/decoding errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for user input outside of records
    #[error("Validation error: {0}")]
    Validation(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {}", r + 1)).unwrap_or_default()
}

impl LedgerError {
    /// Create an "invalid record" error for a single write
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            row: None,
            reason: reason.into(),
        }
    }

    /// Create an "invalid record" error pointing at a row of a bulk write
    pub fn invalid_row(row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            row: Some(row),
            reason: reason.into(),
        }
    }

    /// Create a "store unavailable" error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable(reason.into())
    }

    /// Check if the store could not be reached
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Check if this is a "partition not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PartitionNotFound(_))
    }

    /// Check if a record was rejected
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }

    /// Check if a write lost an optimistic concurrency race
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for WealthFlow operations
pub type LedgerResult<T> = Result<T, LedgerError>;
