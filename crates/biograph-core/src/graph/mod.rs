//! Incremental graph view model.
//!
//! Fragments fetched from the backend are merged into a deduplicated,
//! insertion-ordered [`GraphStore`]. New nodes get a fixed grid position once;
//! a per-category [`FilterConfig`] decides which of them are visible.
//!
//! # Module Structure
//!
//! - `category` - node classification and colour scheme
//! - `model` - raw payloads and normalized node/edge records
//! - `layout` - initial grid placement
//! - `store` - fragment merge
//! - `filter` - category limits and the visible-id set
//! - `view` - render-ready projection

mod category;
mod filter;
mod layout;
mod model;
mod store;
mod view;

pub use category::{Category, CategoryStyle, UnknownCategory};
pub use filter::{
    compute_visibility, CategoryFilter, FilterConfig, FilterError, LimitPolicy, Visibility,
};
pub use layout::GridLayout;
pub use model::{
    display_name, edge_id, Fragment, GraphEdge, GraphNode, Position, RawLink, RawNode,
};
pub use store::{GraphStore, MergeStats};
pub use view::{build_view, EdgeView, GraphView, NodeView};
