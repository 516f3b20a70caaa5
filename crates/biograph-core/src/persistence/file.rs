use std::fs;
use std::path::PathBuf;

use crate::config::PersistenceConfig;

use super::error::PersistError;
use super::StateStore;

/// File-based state store.
///
/// Each key is one JSON file in the state directory:
/// ```text
/// <data_dir>/
///   app-progress.json      # progress object, one section per view
/// ```
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the configured (or platform default) state directory.
    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self::new(config.state_dir())
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Returns the file backing a key.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced so a key can never
    /// escape the state directory.
    pub fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    /// Ensures the state directory exists.
    fn ensure_dir(&self) -> Result<(), PersistError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| PersistError::io(&self.dir, e))?;
        }
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| PersistError::io(&path, e))?;
        Ok(Some(content))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.ensure_dir()?;

        // Write-then-rename so a crash mid-write never leaves a truncated file
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| PersistError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| PersistError::io(&path, e))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| PersistError::io(&path, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path_sanitized() {
        let store = FileStateStore::new("/state");
        assert_eq!(
            store.key_path("app:progress"),
            PathBuf::from("/state/app_progress.json")
        );
        assert_eq!(
            store.key_path("../etc/passwd"),
            PathBuf::from("/state/___etc_passwd.json")
        );
    }
}
