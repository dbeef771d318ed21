//! esdump Pipeline Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Moves documents out of a cluster index into another index or a file, and
//! back from a file into an index.
//!
//! # Architecture
//!
//! ```text
//!  RecordSource ──► dispatch channel (2 × workers) ──► WorkerPool ──► Sink
//!  (cursor pages      bounded, closed once by          N tasks,        File | Cluster
//!   or file lines)    the extractor                    per-record
//!                                                      failure isolation
//! ```
//!
//! The [`Pipeline`](pipeline::Pipeline) coordinator owns the wiring and the
//! record limit. [`Runner`](runner::Runner) resolves a job into a source and a
//! sink and also handles the single-request mapping/settings copies.
//!
//! # Example
//!
//! ```no_run
//! use esdump_pipeline::client::{ClientConfig, ElasticConnector};
//! use esdump_pipeline::job::{TransferJob, TransferRequest};
//! use esdump_pipeline::runner::Runner;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> esdump_common::Result<()> {
//!     let job = TransferJob::resolve(TransferRequest {
//!         input: "http://localhost:9200/logs".into(),
//!         output: "logs.ndjson".into(),
//!         ..TransferRequest::default()
//!     })?;
//!
//!     let runner = Runner::new(Arc::new(ElasticConnector::new(ClientConfig::default())));
//!     let outcome = runner.transfer(&job).await?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dispatch;
pub mod extractor;
pub mod job;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod restore;
pub mod runner;
pub mod sink;
pub mod source;
pub mod target;
pub mod worker;

// Re-export commonly used types
pub use job::{RestoreJob, TransferJob};
pub use pipeline::{Pipeline, PipelineState, TransferReport};
pub use progress::Progress;
pub use runner::{JobOutcome, Runner};
