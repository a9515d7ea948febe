//! In-memory layer handles for drawn geometries.
//!
//! A [`Drawable`] is the native object the map surface attaches and
//! detaches: one geometry plus a session-local [`LayerId`]. Layer ids are
//! never persisted; identity across reloads is structural (the record
//! content itself).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::codec::{self, CodecError, GeometryRecord};

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Session-local handle identifying one drawable layer.
///
/// Monotonic within the process; fresh ids are assigned on every decode, so
/// a persisted AOI gets a new id on each reload.
///
/// # Examples
///
/// ```
/// use aoi_map::drawable::LayerId;
///
/// let a = LayerId::next();
/// let b = LayerId::next();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    /// Allocates a fresh layer id.
    pub fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// One drawn geometry as an attachable map layer.
///
/// Construction validates the backing record, so every drawable in a
/// collection is independently round-trippable through the codec.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    id: LayerId,
    record: GeometryRecord,
}

impl Drawable {
    /// Builds a drawable from a geometry record, assigning a fresh layer id.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the record cannot back a drawable layer
    /// (wrong type tag, unsupported geometry, missing coordinates).
    ///
    /// # Examples
    ///
    /// ```
    /// use aoi_map::codec::GeometryRecord;
    /// use aoi_map::drawable::Drawable;
    /// use serde_json::json;
    ///
    /// let record = GeometryRecord::feature("Point", json!([10.0, 51.0]));
    /// let drawable = Drawable::from_record(record).unwrap();
    /// assert_eq!(drawable.record().geometry.kind, "Point");
    /// ```
    pub fn from_record(record: GeometryRecord) -> Result<Self, CodecError> {
        codec::validate(&record)?;
        Ok(Self {
            id: LayerId::next(),
            record,
        })
    }

    /// This drawable's session-local layer id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The backing geometry record.
    pub fn record(&self) -> &GeometryRecord {
        &self.record
    }

    /// Replaces the geometry content in place, keeping the layer id.
    ///
    /// Used when the drawing tools report an in-place edit.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] and leaves the current content untouched if
    /// the replacement record is not drawable.
    pub fn update_record(&mut self, record: GeometryRecord) -> Result<(), CodecError> {
        codec::validate(&record)?;
        self.record = record;
        Ok(())
    }

    /// Exports this drawable's geometry record, if it can produce one.
    ///
    /// Construction and edits are validated, so this returns `Some` for any
    /// drawable built through the public API; the encoder still skips `None`
    /// so a partial export never fails the save.
    pub fn to_record(&self) -> Option<GeometryRecord> {
        codec::validate(&self.record).ok()?;
        Some(self.record.clone())
    }
}
