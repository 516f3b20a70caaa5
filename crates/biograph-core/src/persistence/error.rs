use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting view state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State store unavailable: {0}")]
    Unavailable(String),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source,
        }
    }
}
