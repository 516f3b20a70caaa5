//! One CLI invocation's view of the explorer.
//!
//! Every graph command restores the saved view, runs, and then closes the
//! session so the debounced write lands before the process exits.

use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::debug;

use biograph_core::persistence::{FileStateStore, ViewPersistence};
use biograph_core::{Config, GraphExplorer, HttpBackend};

pub struct Session {
    pub config: Config,
    pub explorer: GraphExplorer<HttpBackend>,
    pub state_dir: PathBuf,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self> {
        let backend =
            HttpBackend::from_config(&config.api).wrap_err("Failed to create HTTP client")?;

        let store = FileStateStore::from_config(&config.persistence);
        let state_dir = store.dir().clone();
        let persistence = ViewPersistence::from_config(Arc::new(store), &config.persistence);

        let explorer = GraphExplorer::new(backend, config).with_persistence(persistence);
        if explorer.restore() {
            debug!(state_dir = %state_dir.display(), "Restored saved view");
        }

        Ok(Self {
            config: config.clone(),
            explorer,
            state_dir,
        })
    }

    /// Flush pending state and stop the writer.
    pub async fn close(self) {
        self.explorer.shutdown().await;
    }
}
