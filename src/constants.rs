//! Well-known keys and tuning constants for the AOI core.
//!
//! The storage key and default viewport are part of the external contract:
//! hosts that migrate persisted data from the reference web app rely on the
//! `aoi_features` key holding a JSON array of GeoJSON-style features.

/// Storage key under which the persisted AOI set lives.
///
/// Absence of this key is equivalent to an empty AOI set.
pub const STORAGE_KEY: &str = "aoi_features";

/// Debounce window applied between a mutation event and the persisted write.
///
/// Drawing tools emit bursts of edit events (e.g. dragging a vertex); writes
/// within this window are coalesced into a single save.
pub const DEBOUNCE_WINDOW_MS: u64 = 300;

/// Default map center latitude (Germany).
pub const DEFAULT_CENTER_LAT: f64 = 51.1657;

/// Default map center longitude (Germany).
pub const DEFAULT_CENTER_LON: f64 = 10.4515;

/// Default zoom level for the initial viewport.
pub const DEFAULT_ZOOM: u8 = 6;

/// Zoom level used when jumping to a geocoded search result.
pub const SEARCH_ZOOM: u8 = 12;
