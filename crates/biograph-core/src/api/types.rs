//! Request options and response shapes of the graph endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ApiConfig;
use crate::graph::{Fragment, RawLink, RawNode};
use crate::value::{null_as_default, Scalar};

/// One candidate returned by `GET /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Map<String, Value>,
}

impl SearchHit {
    /// Node id usable with `expand`.
    pub fn key(&self) -> Option<String> {
        self.id.as_ref().and_then(Scalar::as_key)
    }

    /// Name shown in result lists: name, then label, then id.
    pub fn title(&self) -> String {
        [&self.name, &self.label]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.key())
            .unwrap_or_default()
    }

    /// Seed for a subgraph load: the name when present, else the id.
    pub fn seed(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.key())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SearchHit>,
}

/// Response of `GET /api/expand/{id}`. The `center` member is ignored; the
/// expanded node is always one of the link endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ExpandResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<RawNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<RawLink>,
}

impl From<ExpandResponse> for Fragment {
    fn from(response: ExpandResponse) -> Self {
        Fragment::new(response.nodes, response.links)
    }
}

/// Query options for `GET /api/graph/{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgraphOptions {
    pub depth: u32,
    pub max_nodes: u32,
    pub min_degree: u32,
    /// Restrict returned nodes to these labels. Empty means all.
    pub labels: Vec<String>,
}

impl SubgraphOptions {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            depth: config.subgraph_depth,
            max_nodes: config.subgraph_max_nodes,
            min_degree: config.min_degree,
            labels: Vec::new(),
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u32) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("depth", self.depth.to_string()),
            ("max_nodes", self.max_nodes.to_string()),
            ("min_degree", self.min_degree.to_string()),
        ];
        if !self.labels.is_empty() {
            pairs.push(("labels", self.labels.join(",")));
        }
        pairs
    }
}

impl Default for SubgraphOptions {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}
