//! esdump CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Command-line interface for moving Elasticsearch indices around.
//!
//! # Overview
//!
//! - **Transfer**: copy an index to another index or into a file (`esdump transfer`)
//! - **Backup**: dump an index into a line-delimited JSON file (`esdump backup`)
//! - **Restore**: load a backup file into an index (`esdump restore`)
//!
//! Each command can also copy an index's mapping or settings instead of its
//! documents (`--type mapping|settings`).

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Args, Parser, Subcommand};
use esdump_pipeline::job::{RestoreRequest, TransferRequest, DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE};

/// esdump - Elasticsearch dump, transfer and restore
#[derive(Parser, Debug)]
#[command(name = "esdump")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the full command reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy an index into another index or a file
    Transfer(TransferArgs),

    /// Dump an index into a file
    Backup(TransferArgs),

    /// Load a backup file into an index
    Restore(RestoreArgs),
}

/// Options shared by `transfer` and `backup`
#[derive(Args, Debug, Clone)]
pub struct TransferArgs {
    /// Source index URL, e.g. http://localhost:9200/logs
    #[arg(short, long)]
    pub input: String,

    /// Destination index URL or file path
    #[arg(short, long)]
    pub output: String,

    /// What to copy: data, mapping or settings
    #[arg(short = 't', long = "type", default_value = "data")]
    pub kind: String,

    /// Stop after this many documents (0 = all)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub limit: i64,

    /// Number of concurrent writers
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY as i64, allow_negative_numbers = true)]
    pub concurrency: i64,

    /// File format: json or ndjson (both one document per line)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Documents per scroll page
    #[arg(short, long = "scroll-size", default_value_t = DEFAULT_PAGE_SIZE as i64, allow_negative_numbers = true)]
    pub scroll_size: i64,

    #[command(flatten)]
    pub auth: AuthArgs,
}

impl TransferArgs {
    /// Raw request, using `default_format` when `--format` was not given
    pub fn to_request(&self, default_format: &str) -> TransferRequest {
        TransferRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            kind: self.kind.clone(),
            limit: self.limit,
            concurrency: self.concurrency,
            format: self.format.clone().unwrap_or_else(|| default_format.to_string()),
            page_size: self.scroll_size,
        }
    }
}

/// Options for `restore`
#[derive(Args, Debug, Clone)]
pub struct RestoreArgs {
    /// Backup file to read
    #[arg(short, long)]
    pub input: String,

    /// Destination index URL, e.g. http://localhost:9200/logs-restored
    #[arg(short, long)]
    pub output: String,

    /// What to restore: data, mapping or settings
    #[arg(short = 't', long = "type", default_value = "data")]
    pub kind: String,

    /// Number of concurrent writers
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY as i64, allow_negative_numbers = true)]
    pub concurrency: i64,

    #[command(flatten)]
    pub auth: AuthArgs,
}

impl RestoreArgs {
    pub fn to_request(&self) -> RestoreRequest {
        RestoreRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            kind: self.kind.clone(),
            concurrency: self.concurrency,
        }
    }
}

/// Cluster credentials. Fall back to `ESDUMP_USERNAME` / `ESDUMP_PASSWORD`.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Username for HTTP basic auth
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for HTTP basic auth
    #[arg(short, long)]
    pub password: Option<String>,
}
