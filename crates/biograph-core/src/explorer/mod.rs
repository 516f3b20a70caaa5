//! Graph explorer view model.
//!
//! Ties the backend, the graph store, the category filter, and the debounced
//! persistence together. All state sits behind one mutex that is never held
//! across an `.await`, so concurrent requests on a shared `&GraphExplorer`
//! merge in whatever order they complete.

mod error;

pub use error::ExplorerError;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::api::{ApiError, GraphBackend, SearchHit, SubgraphOptions};
use crate::config::{ApiConfig, Config};
use crate::graph::{
    build_view, compute_visibility, Category, FilterConfig, Fragment, GraphStore, GraphView,
    GridLayout, LimitPolicy, MergeStats, Visibility,
};
use crate::persistence::{ViewPersistence, ViewSnapshot};

#[derive(Debug, Default)]
struct ViewState {
    store: GraphStore,
    filters: FilterConfig,
    query: String,
    results: Vec<SearchHit>,
    last_error: Option<String>,
}

impl ViewState {
    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::new(
            self.store.nodes().cloned().collect(),
            self.store.edges().cloned().collect(),
            self.filters.clone(),
            self.query.clone(),
            self.results.clone(),
        )
    }
}

/// Decrements the in-flight counter when the request finishes, however it ends.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The knowledge-graph explorer.
///
/// # Example
///
/// ```ignore
/// use biograph_core::{Config, GraphExplorer, HttpBackend};
///
/// let config = Config::load()?;
/// let explorer = GraphExplorer::new(HttpBackend::from_config(&config.api)?, &config);
/// explorer.load_subgraph("Microgravity", None).await?;
/// let view = explorer.view();
/// ```
pub struct GraphExplorer<B: GraphBackend> {
    backend: B,
    api: ApiConfig,
    layout: GridLayout,
    limit_policy: LimitPolicy,
    state: Mutex<ViewState>,
    in_flight: AtomicUsize,
    persistence: Option<ViewPersistence>,
}

impl<B: GraphBackend> GraphExplorer<B> {
    /// Create an explorer with empty state and no persistence.
    pub fn new(backend: B, config: &Config) -> Self {
        Self {
            backend,
            api: config.api.clone(),
            layout: GridLayout::from_config(&config.graph.layout),
            limit_policy: config.graph.limit_policy,
            state: Mutex::new(ViewState::default()),
            in_flight: AtomicUsize::new(0),
            persistence: None,
        }
    }

    /// Attach persistence. Nothing is loaded until [`restore`](Self::restore).
    pub fn with_persistence(mut self, persistence: ViewPersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // State is plain data; a panic elsewhere cannot leave it half-merged
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_save(&self, state: &ViewState) {
        if let Some(persistence) = &self.persistence {
            persistence.schedule(state.snapshot());
        }
    }

    /// Initialize state from the saved snapshot.
    ///
    /// Returns `true` when a snapshot was applied. Limits are re-clamped to
    /// the restored counts.
    pub fn restore(&self) -> bool {
        let Some(snapshot) = self.persistence.as_ref().and_then(ViewPersistence::load) else {
            return false;
        };

        let store = GraphStore::from_parts(snapshot.nodes, snapshot.edges);
        let mut filters = snapshot.filters.normalized();
        filters.reclamp(&store.counts());

        info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            saved_at = %snapshot.saved_at,
            "Restored view state"
        );

        let mut state = self.lock();
        state.store = store;
        state.filters = filters;
        state.query = snapshot.query;
        state.results = snapshot.results;
        state.last_error = None;
        true
    }

    /// Search the backend and keep the hits as the current result list.
    ///
    /// A blank term returns the current results without a request.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchHit>, ExplorerError> {
        if term.trim().is_empty() {
            return Ok(self.results());
        }
        {
            let mut state = self.lock();
            state.query = term.to_string();
            self.schedule_save(&state);
        }

        let result = {
            let _guard = InFlight::start(&self.in_flight);
            self.backend.search(term, self.api.search_limit).await
        };
        let hits = self.record(result)?;

        let mut state = self.lock();
        state.results = hits.clone();
        self.schedule_save(&state);
        debug!(term, hits = hits.len(), "Search complete");
        Ok(hits)
    }

    /// Load the subgraph around `seed` and merge it.
    ///
    /// `None` uses the configured depth and node cap.
    pub async fn load_subgraph(
        &self,
        seed: &str,
        options: Option<SubgraphOptions>,
    ) -> Result<MergeStats, ExplorerError> {
        let options = options.unwrap_or_else(|| SubgraphOptions::from_config(&self.api));
        let result = {
            let _guard = InFlight::start(&self.in_flight);
            self.backend.subgraph(seed, &options).await
        };
        let fragment = self.record(result)?;
        Ok(self.apply(fragment, seed))
    }

    /// Fetch a node's neighbourhood and merge it.
    pub async fn expand(&self, node_id: &str) -> Result<MergeStats, ExplorerError> {
        let result = {
            let _guard = InFlight::start(&self.in_flight);
            self.backend.expand(node_id).await
        };
        let fragment = self.record(result)?;
        Ok(self.apply(fragment, node_id))
    }

    /// Record the outcome of a backend call in `last_error`.
    fn record<T>(&self, result: Result<T, ApiError>) -> Result<T, ExplorerError> {
        let mut state = self.lock();
        match result {
            Ok(value) => {
                state.last_error = None;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Backend request failed");
                state.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn apply(&self, fragment: Fragment, origin: &str) -> MergeStats {
        if fragment.is_empty() {
            return MergeStats::default();
        }

        let mut state = self.lock();
        let previous = state.store.counts();
        let stats = state.store.merge(fragment, &self.layout);
        let current = state.store.counts();
        state.filters.apply_counts(&previous, &current, self.limit_policy);
        self.schedule_save(&state);

        info!(
            origin,
            added_nodes = stats.added_nodes,
            added_edges = stats.added_edges,
            total_nodes = state.store.node_count(),
            "Merged fragment"
        );
        stats
    }

    pub fn set_category_enabled(
        &self,
        category: Category,
        enabled: bool,
    ) -> Result<(), ExplorerError> {
        let mut state = self.lock();
        state.filters.set_enabled(category, enabled)?;
        self.schedule_save(&state);
        Ok(())
    }

    /// Flip a category, returning whether it is now enabled.
    pub fn toggle_category(&self, category: Category) -> Result<bool, ExplorerError> {
        let mut state = self.lock();
        let enabled = state.filters.toggle(category)?;
        self.schedule_save(&state);
        Ok(enabled)
    }

    /// Set a category limit, clamped to the number of nodes available.
    pub fn set_category_limit(
        &self,
        category: Category,
        requested: i64,
    ) -> Result<usize, ExplorerError> {
        let mut state = self.lock();
        let available = state.store.count(category);
        let limit = state.filters.set_limit(category, requested, available)?;
        self.schedule_save(&state);
        Ok(limit)
    }

    pub fn visibility(&self) -> Visibility {
        let state = self.lock();
        compute_visibility(&state.store, &state.filters)
    }

    pub fn view(&self) -> GraphView {
        let state = self.lock();
        let visibility = compute_visibility(&state.store, &state.filters);
        build_view(&state.store, &visibility)
    }

    /// Run `f` against the current store.
    pub fn with_store<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> R {
        f(&self.lock().store)
    }

    pub fn counts(&self) -> BTreeMap<Category, usize> {
        self.lock().store.counts()
    }

    pub fn filters(&self) -> FilterConfig {
        self.lock().filters.clone()
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn results(&self) -> Vec<SearchHit> {
        self.lock().results.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Requests currently awaiting the backend.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock().snapshot()
    }

    /// Reset everything and remove the saved state.
    pub async fn clear(&self) {
        {
            let mut state = self.lock();
            *state = ViewState::default();
        }
        if let Some(persistence) = &self.persistence {
            persistence.clear().await;
        }
        info!("Cleared view state");
    }

    /// Write any pending state now.
    pub async fn flush(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.flush().await;
        }
    }

    /// Flush pending state and stop the writer.
    pub async fn shutdown(self) {
        if let Some(persistence) = self.persistence {
            persistence.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RawLink, RawNode};
    use async_trait::async_trait;

    struct StaticBackend {
        fragment: Fragment,
    }

    #[async_trait]
    impl GraphBackend for StaticBackend {
        async fn search(&self, _term: &str, _limit: usize) -> Result<Vec<SearchHit>, ApiError> {
            Ok(Vec::new())
        }

        async fn subgraph(
            &self,
            _seed: &str,
            _options: &SubgraphOptions,
        ) -> Result<Fragment, ApiError> {
            Ok(self.fragment.clone())
        }

        async fn expand(&self, _node_id: &str) -> Result<Fragment, ApiError> {
            Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    fn explorer() -> GraphExplorer<StaticBackend> {
        let fragment = Fragment::new(
            vec![
                RawNode::new("1").with_label("Gene"),
                RawNode::new("2").with_label("Publication"),
            ],
            vec![RawLink::new("a", "1", "2").with_type("mentions")],
        );
        GraphExplorer::new(StaticBackend { fragment }, &Config::default())
    }

    #[tokio::test]
    async fn test_merge_resets_limits() {
        let explorer = explorer();
        explorer.load_subgraph("x", None).await.unwrap();

        let filters = explorer.filters();
        assert_eq!(filters.get(Category::Gene).map(|f| f.limit), Some(1));
        assert_eq!(explorer.visibility().visible_node_count(), 2);
        assert_eq!(explorer.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failure_sets_last_error() {
        let explorer = explorer();
        explorer.load_subgraph("x", None).await.unwrap();

        let err = explorer.expand("1").await.unwrap_err();
        assert!(matches!(err, ExplorerError::Backend(_)));
        assert!(explorer.last_error().unwrap().contains("boom"));
        assert_eq!(explorer.with_store(|s| s.node_count()), 2);
        assert_eq!(explorer.in_flight(), 0);

        explorer.load_subgraph("x", None).await.unwrap();
        assert!(explorer.last_error().is_none());
    }

    #[test]
    fn test_publication_not_filterable() {
        let explorer = explorer();
        assert!(matches!(
            explorer.toggle_category(Category::Publication),
            Err(ExplorerError::Filter(_))
        ));
    }
}
