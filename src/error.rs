//! Crate-level error type.
//!
//! Individual subsystems define their own focused errors
//! ([`CodecError`](crate::codec::CodecError),
//! [`StorageError`](crate::store::backend::StorageError),
//! [`SurfaceError`](crate::surface::SurfaceError),
//! [`GeocodeError`](crate::geocode::GeocodeError)); [`AoiError`] aggregates
//! them for callers that drive the store and codec directly.
//!
//! Note that the orchestrator itself never surfaces these as failures: per
//! the degradation policy, corruption decodes to an empty set, per-record
//! failures skip, and viewport/geocode failures are logged and swallowed.

use crate::codec::CodecError;
use crate::geocode::GeocodeError;
use crate::store::backend::StorageError;
use crate::surface::SurfaceError;

/// Any error produced by the AOI core.
#[derive(Debug, thiserror::Error)]
pub enum AoiError {
    /// A storage backend operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A geometry record was rejected by the codec.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The map surface rejected an operation.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A geocoding lookup failed.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AoiError>;
