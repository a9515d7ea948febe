//! File-backed storage backend.
//!
//! One UTF-8 text file per key under a root directory, so a headless
//! deployment gets an actually-durable store. Writes go through a sibling
//! temp file and a rename, so a reader never observes a half-written blob.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::store::backend::{StorageBackend, StorageError};

/// Durable [`StorageBackend`] storing each key as a file.
///
/// Keys map to file names directly; path separators and parent references
/// are rejected so a key can never escape the root directory.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::backend("failed to create store directory", e))?;
        Ok(Self { root })
    }

    /// The directory this backend stores files under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let sane = !key.is_empty()
            && !key.contains(['/', '\\'])
            && key != "."
            && key != ".."
            && !key.ends_with(".tmp");
        if !sane {
            return Err(StorageError::Backend {
                message: format!("invalid storage key: {key:?}"),
                source: None,
            });
        }
        Ok(self.root.join(key))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::backend("failed to read store file", e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!("{key}.tmp"));
        fs::write(&tmp, value)
            .map_err(|e| StorageError::backend("failed to write store file", e))?;
        fs::rename(&tmp, &path)
            .map_err(|e| StorageError::backend("failed to commit store file", e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::backend("failed to remove store file", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> (tempfile::TempDir, FileBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        (dir, backend)
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, backend) = backend();
        backend.set("aoi_features", "[]").unwrap();
        assert_eq!(backend.get("aoi_features").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn get_absent_key_is_none() {
        let (_dir, backend) = backend();
        assert_eq!(backend.get("aoi_features").unwrap(), None);
    }

    #[test]
    fn remove_deletes_the_file_and_is_idempotent() {
        let (_dir, backend) = backend();
        backend.set("aoi_features", "[]").unwrap();
        backend.remove("aoi_features").unwrap();
        backend.remove("aoi_features").unwrap();
        assert_eq!(backend.get("aoi_features").unwrap(), None);
    }

    #[test]
    fn value_survives_backend_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let backend = FileBackend::new(dir.path()).unwrap();
            backend.set("aoi_features", r#"[{"type":"Feature"}]"#).unwrap();
        }
        let reopened = FileBackend::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get("aoi_features").unwrap().as_deref(),
            Some(r#"[{"type":"Feature"}]"#)
        );
    }

    #[test]
    fn rejects_path_escaping_keys() {
        let (_dir, backend) = backend();
        assert!(backend.get("../escape").is_err());
        assert!(backend.set("a/b", "v").is_err());
        assert!(backend.remove("..").is_err());
    }
}
