//! Remote store client
//!
//! [`ClusterClient`] is the seam between the pipeline and a cluster. The
//! pipeline only ever talks to this trait; [`ElasticClient`] implements it over
//! the Elasticsearch REST API and tests substitute an in-memory store.

pub mod elastic;
pub mod endpoints;

pub use elastic::{ClientConfig, ElasticClient, ElasticConnector};

use async_trait::async_trait;
use esdump_common::{types::Source, Record, Result};
use serde_json::Value;
use std::sync::Arc;

/// How long the server keeps a cursor alive between two page requests.
/// Renewed by every continuation call.
pub const SCROLL_KEEP_ALIVE: &str = "5m";

/// One page of a paginated read
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Opaque token to pass to [`ClusterClient::scroll`]; never inspected
    pub cursor: String,
    pub records: Vec<Record>,
}

/// Operations the pipeline needs from a cluster
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Number of documents in `index`
    async fn count(&self, index: &str) -> Result<u64>;

    /// Open a cursor over `index` and return its first page
    async fn search(&self, index: &str, size: usize) -> Result<Page>;

    /// Next page for a cursor. Continuing an expired cursor is an error.
    async fn scroll(&self, cursor: &str) -> Result<Page>;

    /// Release a cursor before its keep-alive runs out
    async fn clear_scroll(&self, _cursor: &str) -> Result<()> {
        Ok(())
    }

    /// Create or replace one document
    async fn upsert(&self, index: &str, id: &str, source: &Source) -> Result<()>;

    async fn get_mapping(&self, index: &str) -> Result<Value>;

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<()>;

    async fn get_settings(&self, index: &str) -> Result<Value>;

    async fn put_settings(&self, index: &str, settings: &Value) -> Result<()>;
}

/// Opens clients for cluster base URLs
///
/// A job may name two clusters (source and destination); the runner asks the
/// connector for each instead of knowing how clients are built.
pub trait Connector: Send + Sync {
    fn connect(&self, base_url: &str) -> Result<Arc<dyn ClusterClient>>;
}
