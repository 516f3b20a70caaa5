use thiserror::Error;

use crate::api::ApiError;
use crate::graph::FilterError;

/// Errors surfaced by explorer operations.
///
/// Persistence failures never appear here; they are logged instead.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Backend request failed: {0}")]
    Backend(#[from] ApiError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}
