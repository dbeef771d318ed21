//! Error types for esdump

use thiserror::Error;

/// Result type alias for esdump operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Main error type for esdump
///
/// Setup errors (`Config`, `InvalidTarget`, `UnsupportedType`,
/// `UnsupportedFormat`, `Io` while opening the destination) abort a run before
/// any record moves. `Extraction` and `Cancelled` end a run that already
/// started. `Cluster` and `Network` are what a single remote call returns; the
/// worker pool logs them per record instead of propagating.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Unsupported job type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Cluster returned {status}: {body}")]
    Cluster { status: u16, body: String },

    #[error("Extraction failed after {enqueued} record(s): {reason}")]
    Extraction { reason: String, enqueued: u64 },

    #[error("Transfer cancelled")]
    Cancelled,
}

impl DumpError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid target error
    pub fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
