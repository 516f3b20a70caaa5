use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::PersistError;
use super::StateStore;
use crate::api::SearchHit;
use crate::config::PersistenceConfig;
use crate::graph::{FilterConfig, GraphEdge, GraphNode};

/// Current layout of [`ViewSnapshot`]. Bump when a field changes meaning.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Everything needed to restore the explorer after a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub filters: FilterConfig,
    pub query: String,
    pub results: Vec<SearchHit>,
}

impl ViewSnapshot {
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        filters: FilterConfig,
        query: impl Into<String>,
        results: Vec<SearchHit>,
    ) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            nodes,
            edges,
            filters,
            query: query.into(),
            results,
        }
    }
}

/// Reads and writes the explorer's section of the progress object.
///
/// The progress object is a JSON object stored under one key; each view owns
/// one section of it. Writes replace only this section.
#[derive(Clone)]
pub struct ViewStateRepository {
    store: Arc<dyn StateStore>,
    namespace: String,
    section: String,
}

impl ViewStateRepository {
    pub fn new(
        store: Arc<dyn StateStore>,
        namespace: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            section: section.into(),
        }
    }

    pub fn from_config(store: Arc<dyn StateStore>, config: &PersistenceConfig) -> Self {
        Self::new(store, config.namespace.clone(), config.section.clone())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Load the saved snapshot.
    ///
    /// Missing, corrupt, and newer-schema payloads all yield `Ok(None)`; only
    /// store failures are errors.
    pub fn load(&self) -> Result<Option<ViewSnapshot>, PersistError> {
        let Some(mut progress) = self.read_progress()? else {
            return Ok(None);
        };
        let Some(section) = progress.remove(&self.section) else {
            return Ok(None);
        };

        let snapshot: ViewSnapshot = match serde_json::from_value(section) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(section = %self.section, error = %e, "Ignoring unreadable view snapshot");
                return Ok(None);
            }
        };

        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            warn!(
                found = snapshot.schema_version,
                supported = SNAPSHOT_SCHEMA_VERSION,
                "Ignoring view snapshot from a newer version"
            );
            return Ok(None);
        }

        Ok(Some(snapshot))
    }

    /// Write the snapshot, preserving other sections of the progress object.
    pub fn save(&self, snapshot: &ViewSnapshot) -> Result<(), PersistError> {
        let mut progress = self.read_progress()?.unwrap_or_default();
        progress.insert(self.section.clone(), serde_json::to_value(snapshot)?);
        self.write_progress(&progress)?;

        debug!(
            section = %self.section,
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Saved view snapshot"
        );
        Ok(())
    }

    /// Remove this section; the key itself goes once no sections remain.
    pub fn clear(&self) -> Result<(), PersistError> {
        let Some(mut progress) = self.read_progress()? else {
            return self.store.remove(&self.namespace);
        };

        progress.remove(&self.section);
        if progress.is_empty() {
            self.store.remove(&self.namespace)
        } else {
            self.write_progress(&progress)
        }
    }

    /// Read the progress object. A payload that is not a JSON object counts
    /// as absent.
    fn read_progress(&self) -> Result<Option<Map<String, Value>>, PersistError> {
        let Some(raw) = self.store.load(&self.namespace)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => {
                warn!(key = %self.namespace, "Progress entry is not an object, ignoring");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %self.namespace, error = %e, "Progress entry is corrupt, ignoring");
                Ok(None)
            }
        }
    }

    fn write_progress(&self, progress: &Map<String, Value>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(progress)?;
        self.store.save(&self.namespace, &json)
    }
}
