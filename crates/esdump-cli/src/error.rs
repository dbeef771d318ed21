//! Error types for esdump CLI
//!
//! User-facing errors with a hint about what to check next.

use esdump_common::DumpError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// A pipeline or setup failure
    #[error("{}{}", .0, hint(.0))]
    Dump(DumpError),

    /// Arguments parse but don't make sense together
    #[error("Invalid arguments: {0}. Run 'esdump <command> --help' for usage.")]
    Usage(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your ESDUMP_* environment variables or .env file.")]
    Config(String),

    /// Ctrl-C during a run
    #[error("Interrupted. The destination may hold a partial copy.")]
    Interrupted,
}

impl CliError {
    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<DumpError> for CliError {
    fn from(err: DumpError) -> Self {
        match err {
            DumpError::Cancelled => CliError::Interrupted,
            other => CliError::Dump(other),
        }
    }
}

fn hint(err: &DumpError) -> &'static str {
    match err {
        DumpError::Network(_) => ". Check that the cluster URL is reachable.",
        DumpError::Cluster { status: 401 | 403, .. } => {
            ". Check --username/--password or ESDUMP_USERNAME/ESDUMP_PASSWORD."
        },
        DumpError::Cluster { status: 404, .. } => ". Check that the index exists.",
        DumpError::InvalidTarget { .. } => {
            ". Use http(s)://host:port/index for clusters or a path for files."
        },
        DumpError::Extraction { .. } => ". Records read before the failure were still written.",
        _ => "",
    }
}
