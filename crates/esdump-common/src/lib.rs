//! esdump Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the esdump workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`DumpError`] and the [`Result`] alias
//! - **Types**: the [`Record`] that flows through every transfer
//! - **Logging**: `tracing` subscriber setup shared by all binaries
//!
//! # Example
//!
//! ```no_run
//! use esdump_common::{Record, Result};
//!
//! fn to_line(record: &Record) -> Result<String> {
//!     Ok(record.to_json_line()?)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DumpError, Result};
pub use types::Record;
