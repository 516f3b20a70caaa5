use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::error_message;
use super::types::{ExpandResponse, SearchResponse};
use super::{ApiError, GraphBackend, SearchHit, SubgraphOptions};
use crate::config::ApiConfig;
use crate::graph::Fragment;

/// HTTP client for the bioscience backend.
///
/// Serves both the graph endpoints under `/api` and the publication
/// catalogue endpoints at the root.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Creates a client for the given base URL (e.g. "http://localhost:8000").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Creates a client from configuration, honouring the optional timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            base_url: config.base_url_trimmed().to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl GraphBackend for HttpBackend {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<SearchHit>, ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(&["api", "search"])?;
        let response: SearchResponse = self
            .get_json(url, &[("q", term.to_string()), ("limit", limit.to_string())])
            .await?;
        Ok(response.results)
    }

    async fn subgraph(&self, seed: &str, options: &SubgraphOptions) -> Result<Fragment, ApiError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Ok(Fragment::default());
        }

        let url = self.endpoint(&["api", "graph", seed])?;
        self.get_json(url, &options.query_pairs()).await
    }

    async fn expand(&self, node_id: &str) -> Result<Fragment, ApiError> {
        let node_id = node_id.trim();
        if node_id.is_empty() {
            return Ok(Fragment::default());
        }

        let url = self.endpoint(&["api", "expand", node_id])?;
        let response: ExpandResponse = self.get_json(url, &[]).await?;
        Ok(response.into())
    }
}
