//! Graph fragment payloads and the normalized node/edge records built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::Category;
use crate::value::{null_as_default, Scalar};

/// A node as sent by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub paper_title: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Map<String, Value>,
}

impl RawNode {
    /// Start a raw node with the given id.
    pub fn new(id: impl Into<Scalar>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_paper_title(mut self, title: impl Into<String>) -> Self {
        self.paper_title = Some(title.into());
        self
    }

    /// Store key of this node, if it has a usable id.
    pub fn key(&self) -> Option<String> {
        self.id.as_ref().and_then(Scalar::as_key)
    }
}

/// A relationship as sent by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub source: Option<Scalar>,
    #[serde(default)]
    pub target: Option<Scalar>,
    #[serde(default, rename = "type")]
    pub relation_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Map<String, Value>,
}

impl RawLink {
    pub fn new(
        id: impl Into<Scalar>,
        source: impl Into<Scalar>,
        target: impl Into<Scalar>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            source: Some(source.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, relation_type: impl Into<String>) -> Self {
        self.relation_type = Some(relation_type.into());
        self
    }
}

/// A partial graph payload returned by one backend query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<RawNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<RawLink>,
}

impl Fragment {
    pub fn new(nodes: Vec<RawNode>, links: Vec<RawLink>) -> Self {
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// 2D layout coordinate in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node in the accumulated store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub display_name: String,
    pub category: Category,
    /// Label exactly as the backend sent it.
    #[serde(default)]
    pub label: String,
    /// Assigned at first insertion, never recomputed.
    pub position: Position,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GraphNode {
    pub(crate) fn from_raw(id: String, raw: RawNode, position: Position) -> Self {
        let display_name = display_name(&raw, &id);
        let label = raw.label.unwrap_or_default();
        Self {
            category: Category::from_label(&label),
            id,
            display_name,
            label,
            position,
            properties: raw.props,
        }
    }
}

/// An edge in the accumulated store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relation_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Human-readable node label.
///
/// Precedence: `name`, then `paper_title`, then `label`, then the node id.
/// Blank values are skipped.
pub fn display_name(raw: &RawNode, id: &str) -> String {
    [&raw.name, &raw.paper_title, &raw.label]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(id)
        .to_string()
}

/// Stable edge id.
///
/// Backend relationship ids are prefixed with `e` so they never collide with
/// node ids. Links without an id fall back to their endpoints and type, which
/// is still stable across repeated fetches.
pub fn edge_id(id: Option<&Scalar>, source: &str, target: &str, relation_type: &str) -> String {
    match id.and_then(Scalar::as_key) {
        Some(id) => format!("e{}", id),
        None => format!("e{}:{}:{}", source, relation_type, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_precedence() {
        let raw = RawNode::new("7")
            .with_label("Gene")
            .with_paper_title("A paper")
            .with_name("BRCA1");
        assert_eq!(display_name(&raw, "7"), "BRCA1");

        let raw = RawNode::new("7").with_label("Gene").with_paper_title("A paper");
        assert_eq!(display_name(&raw, "7"), "A paper");

        let raw = RawNode::new("7").with_label("Gene");
        assert_eq!(display_name(&raw, "7"), "Gene");

        assert_eq!(display_name(&RawNode::new("7"), "7"), "7");
    }

    #[test]
    fn test_display_name_skips_blank() {
        let raw = RawNode::new("9").with_name("  ").with_paper_title("Microgravity");
        assert_eq!(display_name(&raw, "9"), "Microgravity");
    }

    #[test]
    fn test_edge_id() {
        assert_eq!(edge_id(Some(&Scalar::from(12)), "1", "2", "mentions"), "e12");
        assert_eq!(edge_id(None, "1", "2", "mentions"), "e1:mentions:2");
    }

    #[test]
    fn test_fragment_tolerates_nulls() {
        let json = r#"{"nodes": null, "links": [{"id": 1, "source": null, "target": "2"}]}"#;
        let fragment: Fragment = serde_json::from_str(json).unwrap();
        assert!(fragment.nodes.is_empty());
        assert_eq!(fragment.links.len(), 1);
        assert!(fragment.links[0].source.is_none());
    }

    #[test]
    fn test_raw_node_numeric_id_and_null_props() {
        let raw: RawNode =
            serde_json::from_str(r#"{"id": 5, "name": "Mouse", "label": "Species", "props": null}"#)
                .unwrap();
        assert_eq!(raw.key(), Some("5".to_string()));
        assert!(raw.props.is_empty());
    }
}
