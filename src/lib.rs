//! Headless draw/persist/reconcile manager for map areas of interest.
//!
//! This crate keeps an in-memory collection of user-drawn geographic areas
//! of interest (AOIs) synchronized with a durable client-side key-value
//! store, across create/edit/delete events, debounced writes, reloads, and
//! visibility toggling. Map rendering and geocoding are external
//! collaborators reached through the [`surface::MapSurface`] and
//! [`geocode::Geocoder`] traits.
//!
//! # Overview
//!
//! On activation the [`manager::DrawManager`] loads the persisted set,
//! decodes it through the [`codec::GeometryCodec`], populates the
//! [`collection::AoiCollection`], and attaches the layers to the map.
//! Drawing-tool events mutate the collection and arm the
//! [`scheduler::SaveScheduler`], which coalesces bursts of edits into a
//! single write through the [`store::AoiStore`].
//!
//! Corruption never blocks a session: unparseable blobs decode to the empty
//! set and individually malformed records are skipped.
//!
//! # Module Organization
//!
//! - [`codec`] - persisted geometry records and the record/drawable codec
//! - [`drawable`] - layer handles with session-local ids
//! - [`collection`] - the in-memory authoritative AOI set
//! - [`scheduler`] - debounced save scheduling
//! - [`store`] - the persistence adapter and its storage backends
//! - [`surface`] - the map rendering collaborator trait
//! - [`geocode`] - the place search collaborator trait
//! - [`manager`] - the orchestrator and host command surface
//! - [`constants`] - well-known keys and tuning constants
//! - [`error`] - crate-level error type

pub mod codec;
pub mod collection;
pub mod constants;
pub mod drawable;
pub mod error;
pub mod geocode;
pub mod manager;
pub mod scheduler;
pub mod store;
pub mod surface;

// Re-exports for ergonomic access
pub use codec::{Geometry, GeometryCodec, GeometryRecord};
pub use collection::AoiCollection;
pub use drawable::{Drawable, LayerId};
pub use error::{AoiError, Result};
pub use geocode::{Geocoder, StaticGeocoder};
pub use manager::{ChangeListener, DrawManager};
pub use scheduler::SaveScheduler;
pub use store::backend::{StorageBackend, StorageError};
pub use store::file::FileBackend;
pub use store::memory::InMemoryBackend;
pub use store::AoiStore;
pub use surface::{Coordinates, MapSurface, NullSurface, Viewport};
