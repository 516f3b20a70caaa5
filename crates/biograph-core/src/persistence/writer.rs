use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::debounce::Debouncer;
use super::snapshot::{ViewSnapshot, ViewStateRepository};
use super::StateStore;
use crate::config::PersistenceConfig;

/// Repository plus the debounced writer in front of it.
pub struct ViewPersistence {
    repository: ViewStateRepository,
    writer: Debouncer<ViewSnapshot>,
}

impl ViewPersistence {
    /// Must be called inside a tokio runtime; the writer is a spawned task.
    pub fn new(repository: ViewStateRepository, debounce: Duration) -> Self {
        let sink = {
            let repository = repository.clone();
            move |snapshot: ViewSnapshot| repository.save(&snapshot)
        };
        Self {
            writer: Debouncer::new(debounce, sink),
            repository,
        }
    }

    pub fn from_config(store: Arc<dyn StateStore>, config: &PersistenceConfig) -> Self {
        Self::new(
            ViewStateRepository::from_config(store, config),
            config.debounce(),
        )
    }

    pub fn repository(&self) -> &ViewStateRepository {
        &self.repository
    }

    /// Load the saved snapshot. Store failures are logged and read as absent.
    pub fn load(&self) -> Option<ViewSnapshot> {
        match self.repository.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to read saved view state");
                None
            }
        }
    }

    pub fn schedule(&self, snapshot: ViewSnapshot) {
        self.writer.schedule(snapshot);
    }

    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Drop any pending write, then remove the saved section.
    pub async fn clear(&self) {
        self.writer.cancel().await;
        if let Err(e) = self.repository.clear() {
            warn!(error = %e, "Failed to remove saved view state");
        }
    }

    /// Flush the pending write and stop the writer.
    pub async fn shutdown(self) {
        self.writer.shutdown().await;
    }
}
