//! Low-level key-value text storage trait.
//!
//! [`StorageBackend`] is the durable substrate the AOI set is persisted
//! into: `get(key) -> Option<String>`, `set(key, value)`, `remove(key)`.
//! Backends are dumb text stores; blob format and degradation policy
//! (garbage decodes to an empty set) live in [`AoiStore`](crate::store::AoiStore),
//! never here.
//!
//! The trait is synchronous: the modeled substrate is a browser-local
//! key-value store with synchronous semantics, and the single writer path
//! is serialized by the cooperative event loop.

use std::sync::Arc;

/// Errors from raw storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O or backend-specific failure (file system error, quota, ...).
    #[error("storage backend error: {message}")]
    Backend {
        /// Human-readable description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The AOI set could not be serialized for writing.
    #[error("failed to serialize AOI set")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Wraps an I/O error in a [`StorageError::Backend`] with context.
    pub fn backend(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Durable key-value text store.
///
/// Implementations must be `Send + Sync`; the debounce timer task may call
/// through from another thread. They must store values verbatim and treat
/// a removed or never-written key as absent, not empty.
pub trait StorageBackend: Send + Sync {
    /// Reads the value at `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on I/O failures.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` at `key`, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on I/O failures.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key` entirely. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on I/O failures.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display_includes_message() {
        let err = StorageError::Backend {
            message: "disk full".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "storage backend error: disk full");
    }

    #[test]
    fn backend_error_exposes_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::backend("write failed", inner);
        let source = std::error::Error::source(&err).expect("source attached");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn arc_backend_delegates() {
        let backend = Arc::new(crate::store::memory::InMemoryBackend::new());
        backend.set("k", "v").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
        backend.remove("k").unwrap();
        assert_eq!(backend.get("k").unwrap(), None);
    }
}
