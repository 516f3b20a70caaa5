use serde::Serialize;

use super::category::{Category, CategoryStyle};
use super::filter::Visibility;
use super::model::Position;
use super::store::GraphStore;

/// Render-ready snapshot of the store under the current filter.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub position: Position,
    pub style: CategoryStyle,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub hidden: bool,
}

impl GraphView {
    pub fn visible_nodes(&self) -> impl Iterator<Item = &NodeView> {
        self.nodes.iter().filter(|n| n.visible)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &EdgeView> {
        self.edges.iter().filter(|e| !e.hidden)
    }
}

/// Project every stored node and edge, flagging what the filter hides.
pub fn build_view(store: &GraphStore, visibility: &Visibility) -> GraphView {
    let nodes = store
        .nodes()
        .map(|n| NodeView {
            id: n.id.clone(),
            label: n.display_name.clone(),
            category: n.category,
            position: n.position,
            style: n.category.style(),
            visible: visibility.is_node_visible(&n.id),
        })
        .collect();

    let edges = store
        .edges()
        .map(|e| EdgeView {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
            label: e.relation_type.clone(),
            hidden: !visibility.is_edge_visible(e),
        })
        .collect();

    GraphView { nodes, edges }
}
