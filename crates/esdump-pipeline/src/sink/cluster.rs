use crate::client::ClusterClient;
use esdump_common::{Record, Result};
use std::sync::Arc;

/// Upserts records into one destination index
///
/// The record's own `_index` is ignored; every record lands in `index`.
pub struct ClusterSink {
    client: Arc<dyn ClusterClient>,
    index: String,
}

impl ClusterSink {
    pub fn new(client: Arc<dyn ClusterClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub async fn write(&self, record: &Record) -> Result<()> {
        self.client
            .upsert(&self.index, &record.id, &record.source)
            .await
    }
}
