//! Configuration management for Biograph.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `biograph.toml` file
//! 3. User config `~/.config/biograph/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::graph::LimitPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,

    /// Graph view configuration.
    pub graph: GraphConfig,

    /// View-state persistence configuration.
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./biograph.toml` (project local)
    /// 2. `~/.config/biograph/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(APP_DIR_NAME).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("BIOGRAPH_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(limit) = std::env::var("BIOGRAPH_SEARCH_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.api.search_limit = n;
            }
        }
        if let Ok(dir) = std::env::var("BIOGRAPH_DATA_DIR") {
            self.persistence.data_dir = Some(dir);
        }
        if let Ok(ms) = std::env::var("BIOGRAPH_DEBOUNCE_MS") {
            if let Ok(n) = ms.parse() {
                self.persistence.debounce_ms = n;
            }
        }
        if let Ok(policy) = std::env::var("BIOGRAPH_LIMIT_POLICY") {
            self.graph.limit_policy = policy
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("unknown limit policy: {}", policy)))?;
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".to_string()));
        }
        if self.graph.layout.min_columns == 0 {
            return Err(ConfigError::Invalid(
                "graph.layout.min_columns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Render this configuration as TOML.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml_string()
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend serving `/api/*` and the publication endpoints.
    pub base_url: String,

    /// Number of candidates requested by a graph search.
    pub search_limit: usize,

    /// Traversal depth for subgraph loads.
    pub subgraph_depth: u32,

    /// Maximum nodes returned by a subgraph load.
    pub subgraph_max_nodes: u32,

    /// Minimum degree of nodes returned by a subgraph load.
    pub min_degree: u32,

    /// Request timeout in seconds. Unset means the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            subgraph_depth: DEFAULT_SUBGRAPH_DEPTH,
            subgraph_max_nodes: DEFAULT_SUBGRAPH_MAX_NODES,
            min_degree: DEFAULT_MIN_DEGREE,
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Graph view configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// What happens to category limits when a merge discovers new nodes.
    pub limit_policy: LimitPolicy,

    /// Initial grid placement of new nodes.
    pub layout: LayoutConfig,
}

/// Grid placement constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub margin_x: f64,
    pub margin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub min_columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            min_columns: DEFAULT_MIN_COLUMNS,
        }
    }
}

/// View-state persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Directory holding persisted state. Unset means the platform data dir.
    pub data_dir: Option<String>,

    /// Key of the persisted progress object.
    pub namespace: String,

    /// Section of the progress object owned by the graph view.
    pub section: String,

    /// Quiet period before a write is issued, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            section: DEFAULT_SECTION.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl PersistenceConfig {
    /// Resolve the directory persisted state lives in.
    pub fn state_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    /// Debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
