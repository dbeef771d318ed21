//! In-memory cluster for pipeline tests
//!
//! Behaves like a cluster as far as the pipeline can tell: searches take a
//! snapshot of the index, cursors are replaced on every continuation, and
//! writes are upserts by id. Knobs make scroll calls or individual writes fail.

#![allow(dead_code)]

use async_trait::async_trait;
use esdump_common::types::Source;
use esdump_common::{DumpError, Record, Result};
use esdump_pipeline::client::{ClusterClient, Connector, Page};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,esdump_pipeline=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// `{"n": i, "title": "doc i"}`
pub fn body(i: usize) -> Source {
    match json!({"n": i, "title": format!("doc {i}"), "tags": ["a", "b"]}) {
        Value::Object(map) => map,
        _ => Source::new(),
    }
}

/// The `{"<index>": {"<key>": ...}}` shape GET returns
fn envelope(index: &str, key: &str, document: Value) -> Value {
    let mut inner = serde_json::Map::new();
    inner.insert(key.to_string(), document);
    let mut outer = serde_json::Map::new();
    outer.insert(index.to_string(), Value::Object(inner));
    Value::Object(outer)
}

#[derive(Default)]
struct Index {
    order: Vec<String>,
    docs: HashMap<String, Source>,
}

impl Index {
    fn upsert(&mut self, id: &str, source: Source) {
        if self.docs.insert(id.to_string(), source).is_none() {
            self.order.push(id.to_string());
        }
    }
}

struct Cursor {
    snapshot: Arc<Vec<Record>>,
    offset: usize,
    size: usize,
}

#[derive(Default)]
pub struct MemoryCluster {
    indices: Mutex<HashMap<String, Index>>,
    cursors: Mutex<HashMap<String, Cursor>>,
    mappings: Mutex<HashMap<String, Value>>,
    settings: Mutex<HashMap<String, Value>>,
    next_cursor: AtomicU64,

    pub searches: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub upserts: AtomicUsize,
    pub requested_sizes: Mutex<Vec<usize>>,
    pub cleared: Mutex<Vec<String>>,

    fail_scroll_after: Option<usize>,
    reject_ids: HashSet<String>,
    write_delay: Option<Duration>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `index` with documents `1..=count`
    pub fn with_index(self, index: &str, count: usize) -> Self {
        {
            let mut indices = self.indices.lock().unwrap();
            let entry = indices.entry(index.to_string()).or_default();
            for i in 1..=count {
                entry.upsert(&i.to_string(), body(i));
            }
        }
        self
    }

    pub fn with_mapping(self, index: &str, mapping: Value) -> Self {
        self.mappings.lock().unwrap().insert(index.to_string(), mapping);
        self
    }

    pub fn with_settings(self, index: &str, settings: Value) -> Self {
        self.settings.lock().unwrap().insert(index.to_string(), settings);
        self
    }

    /// Let `n` continuations succeed, then fail every one after
    pub fn failing_scroll_after(mut self, n: usize) -> Self {
        self.fail_scroll_after = Some(n);
        self
    }

    pub fn rejecting(mut self, ids: &[&str]) -> Self {
        self.reject_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Ids in insertion order
    pub fn ids(&self, index: &str) -> Vec<String> {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|i| i.order.clone())
            .unwrap_or_default()
    }

    pub fn documents(&self, index: &str) -> HashMap<String, Source> {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|i| i.docs.clone())
            .unwrap_or_default()
    }

    pub fn mapping(&self, index: &str) -> Option<Value> {
        self.mappings.lock().unwrap().get(index).cloned()
    }

    pub fn settings(&self, index: &str) -> Option<Value> {
        self.settings.lock().unwrap().get(index).cloned()
    }

    fn open_cursor(&self, snapshot: Arc<Vec<Record>>, offset: usize, size: usize) -> Page {
        let records: Vec<Record> = snapshot.iter().skip(offset).take(size).cloned().collect();
        let id = format!("cursor-{}", self.next_cursor.fetch_add(1, Ordering::SeqCst));
        self.cursors.lock().unwrap().insert(
            id.clone(),
            Cursor {
                snapshot,
                offset: offset + records.len(),
                size,
            },
        );
        Page { cursor: id, records }
    }

    fn missing(index: &str) -> DumpError {
        DumpError::Cluster {
            status: 404,
            body: format!("index_not_found_exception: {index}"),
        }
    }
}

#[async_trait]
impl ClusterClient for MemoryCluster {
    async fn count(&self, index: &str) -> Result<u64> {
        let indices = self.indices.lock().unwrap();
        let index = indices.get(index).ok_or_else(|| Self::missing(index))?;
        Ok(index.order.len() as u64)
    }

    async fn search(&self, index: &str, size: usize) -> Result<Page> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.requested_sizes.lock().unwrap().push(size);

        let snapshot: Vec<Record> = {
            let indices = self.indices.lock().unwrap();
            let docs = indices.get(index).ok_or_else(|| Self::missing(index))?;
            docs.order
                .iter()
                .map(|id| Record::new(index, id.as_str(), docs.docs[id].clone()))
                .collect()
        };

        Ok(self.open_cursor(Arc::new(snapshot), 0, size))
    }

    async fn scroll(&self, cursor: &str) -> Result<Page> {
        let done = self.scrolls.fetch_add(1, Ordering::SeqCst);

        let state = self.cursors.lock().unwrap().remove(cursor).ok_or_else(|| DumpError::Cluster {
            status: 404,
            body: "search_context_missing_exception".to_string(),
        })?;

        if self.fail_scroll_after.is_some_and(|n| done >= n) {
            return Err(DumpError::network("connection reset by peer"));
        }

        Ok(self.open_cursor(state.snapshot, state.offset, state.size))
    }

    async fn clear_scroll(&self, cursor: &str) -> Result<()> {
        self.cursors.lock().unwrap().remove(cursor);
        self.cleared.lock().unwrap().push(cursor.to_string());
        Ok(())
    }

    async fn upsert(&self, index: &str, id: &str, source: &Source) -> Result<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.reject_ids.contains(id) {
            return Err(DumpError::Cluster {
                status: 400,
                body: format!("mapper_parsing_exception: failed to parse document {id}"),
            });
        }

        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.indices
            .lock()
            .unwrap()
            .entry(index.to_string())
            .or_default()
            .upsert(id, source.clone());
        Ok(())
    }

    async fn get_mapping(&self, index: &str) -> Result<Value> {
        let mapping = self.mapping(index).ok_or_else(|| Self::missing(index))?;
        Ok(envelope(index, "mappings", mapping))
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<()> {
        self.mappings.lock().unwrap().insert(index.to_string(), mapping.clone());
        Ok(())
    }

    async fn get_settings(&self, index: &str) -> Result<Value> {
        let settings = self.settings(index).ok_or_else(|| Self::missing(index))?;
        Ok(envelope(index, "settings", settings))
    }

    async fn put_settings(&self, index: &str, settings: &Value) -> Result<()> {
        self.settings.lock().unwrap().insert(index.to_string(), settings.clone());
        Ok(())
    }
}

/// Hands out in-memory clusters by base URL
#[derive(Default)]
pub struct MemoryConnector {
    clusters: HashMap<String, Arc<MemoryCluster>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, base_url: &str, cluster: Arc<MemoryCluster>) -> Self {
        self.clusters.insert(base_url.to_string(), cluster);
        self
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, base_url: &str) -> Result<Arc<dyn ClusterClient>> {
        self.clusters
            .get(base_url)
            .map(|cluster| cluster.clone() as Arc<dyn ClusterClient>)
            .ok_or_else(|| DumpError::network(format!("connection refused: {base_url}")))
    }
}
