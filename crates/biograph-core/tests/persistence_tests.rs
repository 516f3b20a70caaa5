use std::sync::Arc;
use std::time::Duration;

use biograph_core::graph::{Category, FilterConfig, Fragment, GraphStore, GridLayout, RawNode};
use biograph_core::persistence::{
    FileStateStore, StateStore, ViewPersistence, ViewSnapshot, ViewStateRepository,
    SNAPSHOT_SCHEMA_VERSION,
};
use tempfile::TempDir;

fn create_test_store() -> (Arc<FileStateStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileStateStore::new(temp_dir.path().join("state")));
    (store, temp_dir)
}

fn sample_snapshot() -> ViewSnapshot {
    let mut store = GraphStore::new();
    store.merge(
        Fragment::new(
            vec![
                RawNode::new("1").with_label("Gene").with_name("BRCA1"),
                RawNode::new("2").with_label("Publication"),
            ],
            vec![],
        ),
        &GridLayout::default(),
    );
    let mut filters = FilterConfig::default();
    filters.set_limit(Category::Gene, 1, 1).unwrap();

    ViewSnapshot::new(
        store.nodes().cloned().collect(),
        store.edges().cloned().collect(),
        filters,
        "brca",
        vec![],
    )
}

#[test]
fn test_file_store_round_trip() {
    let (store, _temp) = create_test_store();

    assert!(store.load("app-progress").unwrap().is_none());
    store.save("app-progress", "{}").unwrap();
    assert_eq!(store.load("app-progress").unwrap().as_deref(), Some("{}"));

    store.remove("app-progress").unwrap();
    assert!(store.load("app-progress").unwrap().is_none());
    // Removing twice is fine
    store.remove("app-progress").unwrap();
}

#[test]
fn test_repository_round_trip_on_disk() {
    let (store, _temp) = create_test_store();
    let repo = ViewStateRepository::new(store.clone(), "app-progress", "graph_flow");

    let snapshot = sample_snapshot();
    repo.save(&snapshot).unwrap();
    assert!(store.key_path("app-progress").exists());

    let loaded = repo.load().unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.schema_version, SNAPSHOT_SCHEMA_VERSION);
}

#[test]
fn test_saved_layout_uses_sections() {
    let (store, _temp) = create_test_store();
    let repo = ViewStateRepository::new(store.clone(), "app-progress", "graph_flow");
    repo.save(&sample_snapshot()).unwrap();

    let raw = store.load("app-progress").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let section = &value["graph_flow"];
    assert_eq!(section["query"], "brca");
    assert_eq!(section["nodes"][0]["id"], "1");
    assert_eq!(section["filters"]["Gene"]["limit"], 1);
}

#[test]
fn test_corrupt_file_reads_as_absent() {
    let (store, _temp) = create_test_store();
    store.save("app-progress", "\u{0}garbage").unwrap();

    let repo = ViewStateRepository::new(store, "app-progress", "graph_flow");
    assert!(repo.load().unwrap().is_none());

    // A save replaces the corrupt payload
    repo.save(&sample_snapshot()).unwrap();
    assert!(repo.load().unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_debounced_writes_coalesce() {
    let (store, _temp) = create_test_store();
    let repo = ViewStateRepository::new(store.clone(), "app-progress", "graph_flow");
    let persistence = ViewPersistence::new(repo.clone(), Duration::from_millis(700));

    for query in ["a", "ab", "abc"] {
        let mut snapshot = sample_snapshot();
        snapshot.query = query.to_string();
        persistence.schedule(snapshot);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(repo.load().unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(repo.load().unwrap().map(|s| s.query), Some("abc".to_string()));
}

#[tokio::test]
async fn test_shutdown_flushes_pending_write() {
    let (store, _temp) = create_test_store();
    let repo = ViewStateRepository::new(store, "app-progress", "graph_flow");
    let persistence = ViewPersistence::new(repo.clone(), Duration::from_secs(3600));

    persistence.schedule(sample_snapshot());
    persistence.shutdown().await;

    assert!(repo.load().unwrap().is_some());
}

#[tokio::test]
async fn test_write_failure_is_not_fatal() {
    let temp = TempDir::new().unwrap();
    // A regular file where the state directory should be
    let blocked = temp.path().join("state");
    std::fs::write(&blocked, "not a directory").unwrap();

    let store = Arc::new(FileStateStore::new(&blocked));
    let repo = ViewStateRepository::new(store, "app-progress", "graph_flow");
    assert!(repo.save(&sample_snapshot()).is_err());

    let persistence = ViewPersistence::new(repo, Duration::from_millis(10));
    persistence.schedule(sample_snapshot());
    persistence.flush().await;
    persistence.shutdown().await;
}
