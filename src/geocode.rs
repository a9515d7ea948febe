//! Free-text place search collaborator.
//!
//! Geocoding itself is outside the core: a host wires [`Geocoder`] to
//! Nominatim or whatever service it uses. The core only consumes the result
//! to jump the viewport, so a failed or empty lookup leaves the session
//! untouched. [`StaticGeocoder`] is the in-tree implementation for tests
//! and offline fixtures.

use std::collections::HashMap;

use crate::surface::Coordinates;

/// Errors from a geocoding lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The lookup could not be completed (network failure, bad response).
    #[error("geocoding lookup failed: {message}")]
    Lookup {
        /// Human-readable description of the failure.
        message: String,
    },
}

/// Resolves a free-text place query to coordinates.
pub trait Geocoder: Send + Sync {
    /// Looks up `query`, returning `None` when no place matches.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] when the lookup itself fails; the
    /// orchestrator logs and swallows this.
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Geocoder over a fixed set of named places.
///
/// Matching is case-insensitive on the trimmed query.
///
/// # Examples
///
/// ```
/// use aoi_map::geocode::{Geocoder, StaticGeocoder};
///
/// let geocoder = StaticGeocoder::new().with_place("Berlin", 52.52, 13.405);
/// let hit = geocoder.lookup("berlin").unwrap().unwrap();
/// assert_eq!(hit.lat, 52.52);
/// assert!(geocoder.lookup("Atlantis").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, Coordinates>,
}

impl StaticGeocoder {
    /// Creates a geocoder with no known places.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one named place.
    pub fn with_place(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.places
            .insert(name.trim().to_lowercase(), Coordinates::new(lat, lon));
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.places.get(&query.trim().to_lowercase()).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trims() {
        let geocoder = StaticGeocoder::new().with_place("Köln", 50.9375, 6.9603);
        let hit = geocoder.lookup("  KÖLN ").unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn lookup_miss_is_none_not_error() {
        let geocoder = StaticGeocoder::new();
        assert!(geocoder.lookup("nowhere").unwrap().is_none());
    }
}
