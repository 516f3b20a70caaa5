pub mod api;
pub mod config;
pub mod explorer;
pub mod export;
pub mod graph;
pub mod persistence;
pub mod publications;
pub mod value;

pub use api::{ApiError, GraphBackend, HttpBackend, SearchHit, SubgraphOptions};
pub use config::{Config, ConfigError};
pub use explorer::{ExplorerError, GraphExplorer};
pub use export::ExportFormat;
pub use graph::{
    Category, FilterConfig, Fragment, GraphEdge, GraphNode, GraphStore, GraphView, GridLayout,
    LimitPolicy, RawLink, RawNode, Visibility,
};
pub use persistence::{
    FileStateStore, MemoryStateStore, PersistError, StateStore, ViewPersistence, ViewSnapshot,
};
pub use publications::{Publication, PublicationQuery, PublicationsApi};
pub use value::Scalar;
