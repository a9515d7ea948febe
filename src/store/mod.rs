//! Persistence for the AOI set.
//!
//! [`AoiStore`] owns the single well-known storage key and the blob format:
//! one JSON array of geometry records. Backends
//! ([`InMemoryBackend`](memory::InMemoryBackend),
//! [`FileBackend`](file::FileBackend)) are dumb text stores underneath.
//!
//! # Degradation policy
//!
//! `load` never fails: an absent key, an unparseable blob, or a blob that is
//! not an array all decode to the empty set, and individually malformed
//! records inside an otherwise valid array are skipped. Corruption costs at
//! worst the affected AOIs, never the session.

pub mod backend;
pub mod file;
pub mod memory;

use serde_json::Value;

use crate::codec::GeometryRecord;
use crate::constants::STORAGE_KEY;
use crate::error::Result;

use backend::StorageBackend;

/// Persistence adapter over a durable key-value text store.
///
/// # Examples
///
/// ```
/// use aoi_map::codec::GeometryRecord;
/// use aoi_map::store::memory::InMemoryBackend;
/// use aoi_map::store::AoiStore;
/// use serde_json::json;
///
/// let store = AoiStore::new(InMemoryBackend::new());
/// assert!(store.load().is_empty());
///
/// store
///     .save(&[GeometryRecord::feature("Point", json!([10.0, 51.0]))])
///     .unwrap();
/// assert_eq!(store.load().len(), 1);
///
/// store.clear().unwrap();
/// assert!(store.load().is_empty());
/// ```
#[derive(Debug)]
pub struct AoiStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> AoiStore<B> {
    /// Creates a store over `backend` using the well-known AOI key.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Overrides the storage key (multiple independent AOI sets in one
    /// backend).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the persisted AOI set.
    ///
    /// Never raises: absence, read failures, and corruption all yield the
    /// empty set (logged for diagnostics).
    pub fn load(&self) -> Vec<GeometryRecord> {
        let blob = match self.backend.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(%error, key = %self.key, "failed to read AOI store; treating as empty");
                return Vec::new();
            }
        };

        let parsed: Value = match serde_json::from_str(&blob) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::debug!(%error, key = %self.key, "unparseable AOI blob; treating as empty");
                return Vec::new();
            }
        };

        let Value::Array(items) = parsed else {
            tracing::debug!(key = %self.key, "AOI blob is not an array; treating as empty");
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::debug!(%error, "skipping malformed persisted record");
                    None
                }
            })
            .collect()
    }

    /// Serializes and writes the AOI set, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Propagates backend write failures; the orchestrator logs and swallows
    /// them.
    pub fn save(&self, records: &[GeometryRecord]) -> Result<()> {
        let blob = serde_json::to_string(records)
            .map_err(backend::StorageError::Serialize)?;
        self.backend.set(&self.key, &blob)?;
        Ok(())
    }

    /// Removes the key entirely.
    ///
    /// Observably distinct from `save(&[])` at the backend (key absence vs.
    /// an empty-array value); both load back as the empty set.
    ///
    /// # Errors
    ///
    /// Propagates backend removal failures.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key)?;
        Ok(())
    }

    /// Appends one record to the persisted set, leaving the rest untouched.
    ///
    /// This is the injection path of the test/debug surface: it goes through
    /// the same load/save contracts as everything else, so the stored blob
    /// stays a well-formed array.
    ///
    /// # Errors
    ///
    /// Propagates backend write failures.
    pub fn append(&self, record: GeometryRecord) -> Result<()> {
        let mut records = self.load();
        records.push(record);
        self.save(&records)
    }
}
