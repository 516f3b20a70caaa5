//! View-state persistence.
//!
//! The explorer's state is written as one section of a namespaced "progress"
//! JSON object. Writes are debounced so bursts of interaction produce a single
//! write.
//!
//! # Module Structure
//!
//! - `error` - persistence error types
//! - `file` - one JSON file per key
//! - `memory` - in-process store for tests and ephemeral sessions
//! - `snapshot` - snapshot schema and the section-aware repository
//! - `debounce` - quiet-period write coalescing
//! - `writer` - debounced snapshot writer used by the explorer

mod debounce;
mod error;
mod file;
mod memory;
mod snapshot;
mod writer;

pub use debounce::Debouncer;
pub use error::PersistError;
pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use snapshot::{ViewSnapshot, ViewStateRepository, SNAPSHOT_SCHEMA_VERSION};
pub use writer::ViewPersistence;

use std::sync::Arc;

/// Key/value port for persisted state.
///
/// Values are opaque strings (JSON in practice). Implementations must be
/// shareable with the background writer.
pub trait StateStore: Send + Sync {
    /// Read a key. Missing keys are `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Write a key, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        (**self).remove(key)
    }
}
