//! The in-memory authoritative set of currently-drawn geometries.
//!
//! [`AoiCollection`] is pure state: it persists nothing and notifies nobody.
//! The orchestrator observes every mutation and triggers persistence and
//! host notification itself.

use indexmap::IndexMap;

use crate::drawable::{Drawable, LayerId};

/// Ordered collection of active drawable layers, keyed by [`LayerId`].
///
/// Keying by layer id enforces the no-duplicates invariant structurally:
/// `len()` always equals the number of drawables reachable via iteration.
/// Insertion order is kept so the persisted sequence stays stable.
///
/// # Examples
///
/// ```
/// use aoi_map::codec::GeometryRecord;
/// use aoi_map::collection::AoiCollection;
/// use aoi_map::drawable::Drawable;
/// use serde_json::json;
///
/// let mut collection = AoiCollection::new();
/// let drawable =
///     Drawable::from_record(GeometryRecord::feature("Point", json!([10.0, 51.0]))).unwrap();
/// let id = collection.add(drawable);
/// assert_eq!(collection.len(), 1);
/// assert!(collection.remove(id).is_some());
/// assert!(collection.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct AoiCollection {
    layers: IndexMap<LayerId, Drawable>,
}

impl AoiCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a drawable, returning its layer id.
    ///
    /// Re-adding a drawable with an id already present replaces the stored
    /// one; the collection never holds two drawables with the same id.
    pub fn add(&mut self, drawable: Drawable) -> LayerId {
        let id = drawable.id();
        self.layers.insert(id, drawable);
        id
    }

    /// Removes the drawable with the given id, if present.
    pub fn remove(&mut self, id: LayerId) -> Option<Drawable> {
        self.layers.shift_remove(&id)
    }

    /// Removes every drawable, returning the drained set so the caller can
    /// detach the layers from the map.
    pub fn clear(&mut self) -> Vec<Drawable> {
        self.layers.drain(..).map(|(_, drawable)| drawable).collect()
    }

    /// Mutable access to one drawable, for in-place geometry edits.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Drawable> {
        self.layers.get_mut(&id)
    }

    /// Number of active drawables.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the collection holds no drawables.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterates the drawables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.layers.values()
    }

    /// The ids of every active layer, in insertion order.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.keys().copied().collect()
    }
}
