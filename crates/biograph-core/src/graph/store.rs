use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::debug;

use super::category::Category;
use super::layout::{GridCursor, GridLayout};
use super::model::{edge_id, Fragment, GraphEdge, GraphNode, RawNode};
use crate::value::Scalar;

/// Outcome of one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added_nodes: usize,
    pub added_edges: usize,
    /// Raw nodes without a usable id.
    pub dropped_nodes: usize,
    /// Raw links missing a source or target.
    pub dropped_links: usize,
}

impl MergeStats {
    pub fn is_noop(&self) -> bool {
        self.added_nodes == 0 && self.added_edges == 0
    }
}

/// Deduplicated, insertion-ordered node and edge collections.
///
/// Both maps are append-only apart from [`GraphStore::clear`]. Existing
/// entries are never modified by a merge.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<String, GraphNode>,
    edges: IndexMap<String, GraphEdge>,
    /// `None` until the first merge after construction or restore.
    cursor: Option<GridCursor>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted lists. The first occurrence of an id wins.
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut store = Self::new();
        for node in nodes {
            store.nodes.entry(node.id.clone()).or_insert(node);
        }
        for edge in edges {
            store.edges.entry(edge.id.clone()).or_insert(edge);
        }
        store
    }

    /// Merge a fragment into the store.
    ///
    /// Unknown nodes are inserted and placed on the grid; known ids are left
    /// untouched (first write wins). Links missing an endpoint are dropped.
    pub fn merge(&mut self, fragment: Fragment, layout: &GridLayout) -> MergeStats {
        let mut stats = MergeStats::default();
        if fragment.is_empty() {
            return stats;
        }

        let mut fresh: IndexMap<String, RawNode> = IndexMap::new();
        for raw in fragment.nodes {
            let Some(id) = raw.key() else {
                stats.dropped_nodes += 1;
                continue;
            };
            if self.nodes.contains_key(&id) || fresh.contains_key(&id) {
                continue;
            }
            fresh.insert(id, raw);
        }

        let columns = layout.columns(self.nodes.len() + fresh.len());
        let mut cursor = match self.cursor {
            Some(cursor) => cursor,
            None => layout.cursor_below(self.nodes.values().map(|n| n.position.y)),
        };
        for (id, raw) in fresh {
            let (col, row) = cursor.place(columns);
            let position = layout.cell(col, row);
            let node = GraphNode::from_raw(id.clone(), raw, position);
            self.nodes.insert(id, node);
            stats.added_nodes += 1;
        }
        self.cursor = Some(cursor);

        for raw in fragment.links {
            let source = raw.source.as_ref().and_then(Scalar::as_key);
            let target = raw.target.as_ref().and_then(Scalar::as_key);
            let (Some(source), Some(target)) = (source, target) else {
                stats.dropped_links += 1;
                continue;
            };

            let relation_type = raw.relation_type.unwrap_or_default();
            let id = edge_id(raw.id.as_ref(), &source, &target, &relation_type);
            if self.edges.contains_key(&id) {
                continue;
            }
            self.edges.insert(
                id.clone(),
                GraphEdge {
                    id,
                    source,
                    target,
                    relation_type,
                    properties: raw.props,
                },
            );
            stats.added_edges += 1;
        }

        debug!(
            added_nodes = stats.added_nodes,
            added_edges = stats.added_edges,
            dropped_nodes = stats.dropped_nodes,
            dropped_links = stats.dropped_links,
            total_nodes = self.nodes.len(),
            "Merged graph fragment"
        );

        stats
    }

    /// Number of stored nodes per category.
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes.values() {
            *counts.entry(node.category).or_insert(0) += 1;
        }
        counts
    }

    /// Number of stored nodes of one category.
    pub fn count(&self, category: Category) -> usize {
        self.nodes_in(category).count()
    }

    /// Nodes of one category, in insertion order.
    pub fn nodes_in(&self, category: Category) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values().filter(move |n| n.category == category)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.cursor = None;
    }
}
