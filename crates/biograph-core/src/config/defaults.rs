//! Default values for Biograph configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Backend API Defaults
// ============================================================================

/// Default base URL of the bioscience backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default number of candidates returned by a graph search.
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

/// Default traversal depth when loading a subgraph around a seed node.
pub const DEFAULT_SUBGRAPH_DEPTH: u32 = 1;

/// Default cap on nodes returned by a subgraph query.
pub const DEFAULT_SUBGRAPH_MAX_NODES: u32 = 2000;

/// Default minimum degree for nodes returned by a subgraph query.
pub const DEFAULT_MIN_DEGREE: u32 = 0;

/// Default page size for publication listings.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Default fields searched by publication search.
pub const DEFAULT_SEARCH_FIELDS: &str = "title,abstract";

/// Default number of authors returned by the authors endpoint.
pub const DEFAULT_AUTHOR_LIMIT: u32 = 100;

// ============================================================================
// Layout Defaults
// ============================================================================

/// Left margin of the initial grid placement, in pixels.
pub const DEFAULT_MARGIN_X: f64 = 80.0;

/// Top margin of the initial grid placement, in pixels.
pub const DEFAULT_MARGIN_Y: f64 = 80.0;

/// Width of one grid cell, in pixels.
pub const DEFAULT_CELL_WIDTH: f64 = 180.0;

/// Height of one grid cell, in pixels.
pub const DEFAULT_CELL_HEIGHT: f64 = 120.0;

/// Lower bound on grid columns.
pub const DEFAULT_MIN_COLUMNS: usize = 4;

// ============================================================================
// Persistence Defaults
// ============================================================================

/// Application directory name used under the platform data/config dirs.
pub const APP_DIR_NAME: &str = "biograph";

/// Fallback data directory when the platform has no data dir.
pub const DEFAULT_DATA_DIR: &str = ".biograph";

/// Key of the persisted progress object.
pub const DEFAULT_NAMESPACE: &str = "app-progress";

/// Section of the progress object holding the graph view state.
pub const DEFAULT_SECTION: &str = "graph_flow";

/// Quiet period before a view-state write is issued (milliseconds).
pub const DEFAULT_DEBOUNCE_MS: u64 = 700;

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "biograph.toml";

/// User config file name (under `<config_dir>/biograph/`).
pub const USER_CONFIG_FILE: &str = "config.toml";
