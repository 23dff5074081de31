//! Domain error types
//!
//! This module defines the error hierarchy for Curator.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Curator error type
///
/// This is the primary error type used throughout the library.
/// Per-record reconciliation failures are never surfaced through this type;
/// they are recorded as outcomes and counted (see `core::reconcile`).
#[derive(Debug, Error)]
pub enum CuratorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A registry or store lookup found nothing for the given key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation errors (malformed input records, invalid dates)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Extraction service errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Database-related errors (connection pool, SQL)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Document store errors
///
/// Errors raised by `ExhibitionStore` implementations. A transaction that
/// fails with any of these is failed as a whole; nothing it planned is written.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store could not be reached or refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Concurrent writers kept invalidating the transaction's reads
    #[error("Transaction aborted after {attempts} conflicting attempt(s)")]
    TransactionConflict { attempts: usize },

    /// The transaction exceeds the store's per-transaction operation ceiling
    #[error("Transaction has {operations} operations, limit is {limit}")]
    TransactionTooLarge { operations: usize, limit: usize },

    /// A create targeted an identity that already has a document
    #[error("Document already exists: {0}")]
    DocumentExists(String),

    /// A stored document could not be decoded
    #[error("Malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    /// A write was rejected by the store
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Extraction service errors
///
/// Errors that occur when calling the external extraction service.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Failed to connect to the extraction service
    #[error("Failed to connect to extraction service: {0}")]
    ConnectionFailed(String),

    /// Response body was not a recognizable extraction result
    #[error("Invalid response from extraction service: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl ExtractionError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExtractionError::ConnectionFailed(_)
                | ExtractionError::ServerError { .. }
                | ExtractionError::Timeout(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CuratorError {
    fn from(err: std::io::Error) -> Self {
        CuratorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CuratorError {
    fn from(err: serde_json::Error) -> Self {
        CuratorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CuratorError {
    fn from(err: toml::de::Error) -> Self {
        CuratorError::Configuration(format!("TOML parse error: {err}"))
    }
}
