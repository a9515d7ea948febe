//! Thread-safe in-memory storage backend.
//!
//! [`InMemoryBackend`] is a dumb text store over a [`DashMap`]; it backs
//! tests and short-lived sessions where durability is not needed. Share one
//! instance across manager "reloads" (via `Arc`) to model a store that
//! outlives the map view.

use dashmap::DashMap;

use crate::store::backend::{StorageBackend, StorageError};

/// In-memory [`StorageBackend`] over a concurrent map.
///
/// # Examples
///
/// ```
/// use aoi_map::store::backend::StorageBackend;
/// use aoi_map::store::memory::InMemoryBackend;
///
/// let backend = InMemoryBackend::new();
/// backend.set("greeting", "hello").unwrap();
/// assert_eq!(backend.get("greeting").unwrap().as_deref(), Some("hello"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: DashMap<String, String>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `key` currently exists. Lets tests distinguish a removed key
    /// from one holding an empty array.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_absent_key_is_none() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.get("missing").unwrap(), None);
    }

    #[test]
    fn set_overwrites_prior_value() {
        let backend = InMemoryBackend::new();
        backend.set("k", "first").unwrap();
        backend.set("k", "second").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("second"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let backend = InMemoryBackend::new();
        backend.set("k", "v").unwrap();
        backend.remove("k").unwrap();
        backend.remove("k").unwrap();
        assert!(!backend.contains_key("k"));
    }

    #[test]
    fn empty_value_is_distinct_from_absent() {
        let backend = InMemoryBackend::new();
        backend.set("k", "").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some(""));
        assert!(backend.contains_key("k"));
    }
}
