//! The map rendering collaborator.
//!
//! The core never renders anything itself; it drives a [`MapSurface`] that
//! a host wires to its actual map widget. The surface attaches and detaches
//! drawable layers and moves the viewport. Drawing-tool events travel the
//! other way, into the orchestrator's `handle_*` methods.

use crate::codec::GeometryRecord;
use crate::drawable::LayerId;

/// Geographic coordinates in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude, `-90.0..=90.0`.
    pub lat: f64,
    /// Longitude, `-180.0..=180.0`.
    pub lon: f64,
}

impl Coordinates {
    /// Builds a coordinate pair without range checking; callers validate.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and within WGS84 range.
    pub fn in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A map viewport: center plus zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Viewport center.
    pub center: Coordinates,
    /// Tile zoom level.
    pub zoom: u8,
}

impl Default for Viewport {
    /// The initial viewport hosts start from before any user interaction.
    fn default() -> Self {
        Self {
            center: Coordinates::new(
                crate::constants::DEFAULT_CENTER_LAT,
                crate::constants::DEFAULT_CENTER_LON,
            ),
            zoom: crate::constants::DEFAULT_ZOOM,
        }
    }
}

/// Errors the map surface can report.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The requested viewport was rejected by the rendering layer.
    #[error("viewport rejected: {reason}")]
    ViewportRejected {
        /// Why the surface refused the viewport.
        reason: String,
    },
}

/// Rendering surface the orchestrator attaches drawables to.
///
/// Implementations must be `Send + Sync`; they are shared with the debounce
/// timer's persist path. Attach/detach must tolerate redundant calls
/// (detaching a layer that is not attached is a no-op), mirroring how map
/// widgets treat layer membership.
pub trait MapSurface: Send + Sync {
    /// Attaches one drawable layer to the map.
    fn attach_layer(&self, id: LayerId, record: &GeometryRecord);

    /// Detaches one drawable layer from the map.
    fn detach_layer(&self, id: LayerId);

    /// Moves the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ViewportRejected`] if the rendering layer
    /// refuses the jump; the orchestrator swallows this (best-effort).
    fn set_view(&self, viewport: Viewport) -> Result<(), SurfaceError>;
}

/// A surface that drops everything, for headless use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl MapSurface for NullSurface {
    fn attach_layer(&self, _id: LayerId, _record: &GeometryRecord) {}

    fn detach_layer(&self, _id: LayerId) {}

    fn set_view(&self, _viewport: Viewport) -> Result<(), SurfaceError> {
        Ok(())
    }
}
