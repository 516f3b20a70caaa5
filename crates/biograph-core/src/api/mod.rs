mod error;
mod http;
mod types;

pub use error::ApiError;
pub use http::HttpBackend;
pub use types::{SearchHit, SubgraphOptions};

use std::sync::Arc;

use async_trait::async_trait;

use crate::graph::Fragment;

/// Trait for graph query backends.
///
/// The explorer only needs these three calls, so tests can swap in an
/// in-memory backend without touching the network.
///
/// # Example
///
/// ```ignore
/// use biograph_core::api::{GraphBackend, HttpBackend, SubgraphOptions};
///
/// let backend = HttpBackend::new("http://localhost:8000");
/// let hits = backend.search("microgravity", 25).await?;
/// let fragment = backend.subgraph("Microgravity", &SubgraphOptions::default()).await?;
/// ```
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Search nodes by name or paper title.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<SearchHit>, ApiError>;

    /// Load the subgraph around the node(s) named `seed`.
    async fn subgraph(&self, seed: &str, options: &SubgraphOptions) -> Result<Fragment, ApiError>;

    /// Load the direct neighbourhood of one node id.
    async fn expand(&self, node_id: &str) -> Result<Fragment, ApiError>;
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl GraphBackend for Box<dyn GraphBackend> {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<SearchHit>, ApiError> {
        (**self).search(term, limit).await
    }

    async fn subgraph(&self, seed: &str, options: &SubgraphOptions) -> Result<Fragment, ApiError> {
        (**self).subgraph(seed, options).await
    }

    async fn expand(&self, node_id: &str) -> Result<Fragment, ApiError> {
        (**self).expand(node_id).await
    }
}

#[async_trait]
impl<T: GraphBackend + ?Sized> GraphBackend for Arc<T> {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<SearchHit>, ApiError> {
        (**self).search(term, limit).await
    }

    async fn subgraph(&self, seed: &str, options: &SubgraphOptions) -> Result<Fragment, ApiError> {
        (**self).subgraph(seed, options).await
    }

    async fn expand(&self, node_id: &str) -> Result<Fragment, ApiError> {
        (**self).expand(node_id).await
    }
}
