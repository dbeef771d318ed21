//! HTTP client for Elasticsearch-compatible clusters

use super::{endpoints, ClusterClient, Connector, Page, SCROLL_KEEP_ALIVE};
use async_trait::async_trait;
use esdump_common::{types::Source, DumpError, Record, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Client Constants
// ============================================================================

/// Default timeout for cluster requests in seconds.
/// Large pages on a busy cluster can take a while to come back.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connection settings shared by every client a run opens
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Basic auth is only sent when both halves are present and non-empty
    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    #[serde(default)]
    hits: Hits,
}

#[derive(Debug, Default, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Record>,
}

/// Cluster client speaking the Elasticsearch REST API
pub struct ElasticClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl ElasticClient {
    pub fn new(base_url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(network)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.credentials() {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await.map_err(network)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DumpError::Cluster {
            status: status.as_u16(),
            body,
        })
    }

    async fn page(&self, request: RequestBuilder) -> Result<Page> {
        let response: ScrollResponse = self.send(request).await?.json().await.map_err(network)?;

        let cursor = response
            .scroll_id
            .ok_or_else(|| DumpError::network("search response did not include a scroll id"))?;

        Ok(Page {
            cursor,
            records: response.hits.hits,
        })
    }

    async fn get_json(&self, url: String) -> Result<Value> {
        self.send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(network)
    }

    async fn put_json(&self, url: String, body: &Value) -> Result<()> {
        self.send(self.client.put(url).json(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl ClusterClient for ElasticClient {
    async fn count(&self, index: &str) -> Result<u64> {
        let url = endpoints::count_url(&self.base_url, index);
        let response: CountResponse = self
            .send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(network)?;

        Ok(response.count)
    }

    async fn search(&self, index: &str, size: usize) -> Result<Page> {
        let url = endpoints::search_url(&self.base_url, index, size);
        self.page(self.client.get(url)).await
    }

    async fn scroll(&self, cursor: &str) -> Result<Page> {
        let url = endpoints::scroll_url(&self.base_url);
        let body = json!({ "scroll": SCROLL_KEEP_ALIVE, "scroll_id": cursor });
        self.page(self.client.post(url).json(&body)).await
    }

    async fn clear_scroll(&self, cursor: &str) -> Result<()> {
        let url = endpoints::scroll_url(&self.base_url);
        let body = json!({ "scroll_id": cursor });
        self.send(self.client.delete(url).json(&body)).await?;
        debug!("Released scroll cursor");
        Ok(())
    }

    async fn upsert(&self, index: &str, id: &str, source: &Source) -> Result<()> {
        let url = endpoints::document_url(&self.base_url, index, id);
        self.send(self.client.put(url).json(source)).await?;
        Ok(())
    }

    async fn get_mapping(&self, index: &str) -> Result<Value> {
        self.get_json(endpoints::mapping_url(&self.base_url, index)).await
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<()> {
        self.put_json(endpoints::mapping_url(&self.base_url, index), mapping)
            .await
    }

    async fn get_settings(&self, index: &str) -> Result<Value> {
        self.get_json(endpoints::settings_url(&self.base_url, index)).await
    }

    async fn put_settings(&self, index: &str, settings: &Value) -> Result<()> {
        self.put_json(endpoints::settings_url(&self.base_url, index), settings)
            .await
    }
}

/// Builds an [`ElasticClient`] per cluster URL with shared credentials
#[derive(Debug, Clone, Default)]
pub struct ElasticConnector {
    config: ClientConfig,
}

impl ElasticConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Connector for ElasticConnector {
    fn connect(&self, base_url: &str) -> Result<Arc<dyn ClusterClient>> {
        Ok(Arc::new(ElasticClient::new(base_url, self.config.clone())?))
    }
}

/// Drops the request URL, which may carry credentials
fn network(err: reqwest::Error) -> DumpError {
    DumpError::network(err.without_url().to_string())
}
