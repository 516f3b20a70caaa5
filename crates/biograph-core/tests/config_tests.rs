use std::time::Duration;

use biograph_core::config::{
    DEFAULT_API_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_NAMESPACE, DEFAULT_SECTION,
    DEFAULT_SUBGRAPH_MAX_NODES,
};
use biograph_core::{Config, ConfigError, LimitPolicy};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_API_URL);
    assert_eq!(config.api.subgraph_max_nodes, DEFAULT_SUBGRAPH_MAX_NODES);
    assert_eq!(config.persistence.namespace, DEFAULT_NAMESPACE);
    assert_eq!(config.persistence.section, DEFAULT_SECTION);
    assert_eq!(
        config.persistence.debounce(),
        Duration::from_millis(DEFAULT_DEBOUNCE_MS)
    );
    assert_eq!(config.graph.limit_policy, LimitPolicy::ResetToAvailable);
}

#[test]
fn test_config_to_toml() {
    let toml_str = Config::default_config_string();
    assert!(toml_str.contains("[api]"));
    assert!(toml_str.contains("[graph.layout]"));
    assert!(toml_str.contains("[persistence]"));
    assert!(toml_str.contains("limit_policy = \"reset-to-available\""));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[api]
base_url = "https://bio.example.org/"
search_limit = 10
timeout_secs = 30

[graph]
limit_policy = "preserve-narrowed"

[graph.layout]
cell_width = 200.0

[persistence]
data_dir = "/tmp/biograph-state"
debounce_ms = 250
"#;
    let config = Config::from_toml_str(toml_str).unwrap();
    assert_eq!(config.api.base_url_trimmed(), "https://bio.example.org");
    assert_eq!(config.api.search_limit, 10);
    assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.graph.limit_policy, LimitPolicy::PreserveNarrowed);
    assert_eq!(config.graph.layout.cell_width, 200.0);
    assert_eq!(config.graph.layout.cell_height, 120.0);
    assert_eq!(
        config.persistence.state_dir(),
        std::path::PathBuf::from("/tmp/biograph-state")
    );
    assert_eq!(config.persistence.debounce_ms, 250);
}

#[test]
fn test_invalid_values_rejected() {
    let empty_url = "[api]\nbase_url = \"  \"\n";
    assert!(matches!(
        Config::from_toml_str(empty_url),
        Err(ConfigError::Invalid(_))
    ));

    let bad_policy = "[graph]\nlimit_policy = \"sometimes\"\n";
    assert!(matches!(
        Config::from_toml_str(bad_policy),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("biograph.toml");
    std::fs::write(&path, "[api]\nsubgraph_depth = 2\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.api.subgraph_depth, 2);

    let missing = temp.path().join("missing.toml");
    assert!(matches!(
        Config::from_file(&missing),
        Err(ConfigError::ReadError(_))
    ));
}
