//! The draw/persist/reconcile orchestrator.
//!
//! [`DrawManager`] wires drawing-tool events to the in-memory
//! [`AoiCollection`], schedules debounced writes through the
//! [`SaveScheduler`], and rehydrates the collection from the
//! [`AoiStore`] on activation. It also carries the small command surface a
//! host UI drives: count, visibility toggle, viewport jump, place search,
//! clear-all.
//!
//! # Event intake
//!
//! The drawing-tool surface reports events explicitly (`handle_created`,
//! `handle_edited`, `handle_deleted`); the collection, not the tool's own
//! layer group, is the single source of truth for membership.
//!
//! # Ordering
//!
//! All mutation happens synchronously inside event handlers under one
//! mutex. The debounce timer re-enters through the same mutex when it
//! fires, so a deferred save always reflects the collection state at fire
//! time, which is the latest state. Scheduling cancels any not-yet-fired
//! save; the single storage key has exactly one writer path (`persist`).

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::codec::{GeometryCodec, GeometryRecord};
use crate::collection::AoiCollection;
use crate::constants::{DEBOUNCE_WINDOW_MS, SEARCH_ZOOM};
use crate::drawable::{Drawable, LayerId};
use crate::geocode::Geocoder;
use crate::scheduler::SaveScheduler;
use crate::store::backend::StorageBackend;
use crate::store::AoiStore;
use crate::surface::{Coordinates, MapSurface, Viewport};

/// Host callback fired with the new AOI count after activation and after
/// every persist or clear.
pub type ChangeListener = Arc<dyn Fn(usize) + Send + Sync>;

struct ManagerState {
    collection: AoiCollection,
    visible: bool,
}

struct ManagerInner<B> {
    store: AoiStore<B>,
    surface: Arc<dyn MapSurface>,
    state: Mutex<ManagerState>,
    on_change: Mutex<Option<ChangeListener>>,
}

impl<B: StorageBackend> ManagerInner<B> {
    /// Encodes the collection and writes it through the store, then tells
    /// the host the new count. Save failures are logged and swallowed; the
    /// in-memory state stays authoritative for the session either way.
    fn persist(&self) {
        let records = {
            let state = self.state.lock();
            GeometryCodec::encode(state.collection.iter())
        };
        let count = records.len();
        if let Err(error) = self.store.save(&records) {
            tracing::warn!(%error, "failed to persist AOI set");
        }
        tracing::debug!(count, "persisted AOI set");
        self.notify(count);
    }

    fn notify(&self, count: usize) {
        let listener = self.on_change.lock().clone();
        if let Some(listener) = listener {
            listener(count);
        }
    }
}

/// Orchestrator keeping drawn AOIs synchronized with the durable store.
///
/// Construct with [`new`](DrawManager::new), configure with the `with_*`
/// builders, then call [`activate`](DrawManager::activate) to rehydrate
/// persisted AOIs. Event handlers must run inside a tokio runtime (the
/// debounce timer is a spawned task).
pub struct DrawManager<B: StorageBackend + 'static> {
    inner: Arc<ManagerInner<B>>,
    scheduler: SaveScheduler,
}

impl<B: StorageBackend + 'static> DrawManager<B> {
    /// Creates a manager over a store and a map surface.
    ///
    /// Layers start visible and the debounce window defaults to
    /// [`DEBOUNCE_WINDOW_MS`].
    pub fn new(store: AoiStore<B>, surface: Arc<dyn MapSurface>) -> Self {
        let inner = Arc::new(ManagerInner {
            store,
            surface,
            state: Mutex::new(ManagerState {
                collection: AoiCollection::new(),
                visible: true,
            }),
            on_change: Mutex::new(None),
        });
        let scheduler = SaveScheduler::new(
            Duration::from_millis(DEBOUNCE_WINDOW_MS),
            persist_action(&inner),
        );
        Self { inner, scheduler }
    }

    /// Overrides the debounce window.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.scheduler = SaveScheduler::new(window, persist_action(&self.inner));
        self
    }

    /// Registers the host's count-change callback.
    pub fn with_on_change(self, listener: ChangeListener) -> Self {
        *self.inner.on_change.lock() = Some(listener);
        self
    }

    /// Sets the initial visibility of the AOI layer group.
    pub fn with_visibility(self, visible: bool) -> Self {
        self.inner.state.lock().visible = visible;
        self
    }

    /// Loads the persisted AOI set, populates the collection, and attaches
    /// the layers to the map (subject to visibility). Notifies the host of
    /// the initial count.
    pub fn activate(&self) {
        let records = self.inner.store.load();
        let drawables = GeometryCodec::decode(records);
        let count = {
            let mut state = self.inner.state.lock();
            for drawable in drawables {
                if state.visible {
                    self.inner.surface.attach_layer(drawable.id(), drawable.record());
                }
                state.collection.add(drawable);
            }
            state.collection.len()
        };
        tracing::debug!(count, "rehydrated persisted AOIs");
        self.inner.notify(count);
    }

    /// Drawing-tool `created` event: one new geometry.
    ///
    /// The record is decoded to a drawable, added to the collection,
    /// attached to the map if visible, and a save is scheduled. A record
    /// the codec rejects is discarded (`None`), never fatal.
    pub fn handle_created(&self, record: GeometryRecord) -> Option<LayerId> {
        let drawable = match Drawable::from_record(record) {
            Ok(drawable) => drawable,
            Err(error) => {
                tracing::warn!(%error, "discarding undrawable created geometry");
                return None;
            }
        };
        let id = drawable.id();
        {
            let mut state = self.inner.state.lock();
            if state.visible {
                self.inner.surface.attach_layer(id, drawable.record());
            }
            state.collection.add(drawable);
        }
        tracing::debug!(layer = %id, "AOI created");
        self.scheduler.schedule();
        Some(id)
    }

    /// Drawing-tool `edited` event: geometry content of existing layers
    /// changed in place. Membership is unchanged; unknown layer ids and
    /// undrawable replacements are skipped with a warning.
    pub fn handle_edited(&self, edits: &[(LayerId, GeometryRecord)]) {
        {
            let mut state = self.inner.state.lock();
            for (id, record) in edits {
                match state.collection.get_mut(*id) {
                    Some(drawable) => {
                        if let Err(error) = drawable.update_record(record.clone()) {
                            tracing::warn!(layer = %id, %error, "ignoring undrawable edit");
                        }
                    }
                    None => tracing::warn!(layer = %id, "edit for unknown layer ignored"),
                }
            }
        }
        self.scheduler.schedule();
    }

    /// Drawing-tool `deleted` event: the given layers are gone.
    ///
    /// Removes them from the collection, detaches them from the map, and
    /// schedules a save. Unknown ids are ignored.
    pub fn handle_deleted(&self, ids: &[LayerId]) {
        {
            let mut state = self.inner.state.lock();
            for id in ids {
                if state.collection.remove(*id).is_some() {
                    if state.visible {
                        self.inner.surface.detach_layer(*id);
                    }
                    tracing::debug!(layer = %id, "AOI deleted");
                }
            }
        }
        self.scheduler.schedule();
    }

    /// Number of AOIs currently in the collection.
    pub fn count(&self) -> usize {
        self.inner.state.lock().collection.len()
    }

    /// Whether the AOI layer group is currently attached to the map.
    pub fn visible(&self) -> bool {
        self.inner.state.lock().visible
    }

    /// Flips visibility, attaching or detaching the whole layer group.
    ///
    /// Returns the new state. Persistence is unaffected.
    pub fn toggle_visibility(&self) -> bool {
        let mut state = self.inner.state.lock();
        state.visible = !state.visible;
        if state.visible {
            for drawable in state.collection.iter() {
                self.inner.surface.attach_layer(drawable.id(), drawable.record());
            }
        } else {
            for id in state.collection.layer_ids() {
                self.inner.surface.detach_layer(id);
            }
        }
        state.visible
    }

    /// Jumps the viewport. Best-effort: out-of-range coordinates and
    /// surface rejections are logged and swallowed, never fatal.
    pub fn set_viewport(&self, lat: f64, lon: f64, zoom: u8) {
        let center = Coordinates::new(lat, lon);
        if !center.in_range() {
            tracing::debug!(lat, lon, "ignoring out-of-range viewport jump");
            return;
        }
        if let Err(error) = self.inner.surface.set_view(Viewport { center, zoom }) {
            tracing::debug!(%error, "viewport jump rejected by surface");
        }
    }

    /// Free-text place search: on a hit, jumps the viewport to the result.
    ///
    /// Returns whether the viewport moved. Lookup failures and misses leave
    /// the viewport unchanged.
    pub fn locate(&self, geocoder: &dyn Geocoder, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        match geocoder.lookup(query) {
            Ok(Some(center)) => {
                self.set_viewport(center.lat, center.lon, SEARCH_ZOOM);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(%error, query, "geocoding lookup failed");
                false
            }
        }
    }

    /// Removes every AOI and the persisted key, immediately (not debounced).
    ///
    /// A pending debounced save is cancelled first so the key ends up
    /// removed rather than rewritten as an empty array.
    pub fn clear_all(&self) {
        self.scheduler.cancel();
        {
            let mut state = self.inner.state.lock();
            let drained = state.collection.clear();
            if state.visible {
                for drawable in &drained {
                    self.inner.surface.detach_layer(drawable.id());
                }
            }
        }
        if let Err(error) = self.inner.store.clear() {
            tracing::warn!(%error, "failed to clear AOI store");
        }
        self.inner.notify(0);
    }

    /// Tears the manager down: flushes any pending save so no in-flight
    /// edit is lost, then detaches the layer group. Idempotent.
    pub fn shutdown(&self) {
        self.scheduler.flush();
        let mut state = self.inner.state.lock();
        if state.visible {
            for id in state.collection.layer_ids() {
                self.inner.surface.detach_layer(id);
            }
            state.visible = false;
        }
    }

    /// Whether a debounced save is currently armed. Test observability.
    pub fn save_pending(&self) -> bool {
        self.scheduler.is_pending()
    }
}

fn persist_action<B: StorageBackend + 'static>(
    inner: &Arc<ManagerInner<B>>,
) -> Arc<dyn Fn() + Send + Sync> {
    let inner = Arc::clone(inner);
    Arc::new(move || inner.persist())
}
