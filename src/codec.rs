//! Conversion between persisted geometry records and drawable layer objects.
//!
//! The persisted representation is a sequence of GeoJSON-style Feature
//! objects (`type` / `geometry` / `properties`). [`GeometryCodec`] is pure:
//! it holds no state and performs no I/O.
//!
//! # Failure semantics
//!
//! Decoding and encoding are both best-effort. A record that cannot produce
//! a drawable is skipped individually and never aborts the rest of the
//! sequence; a drawable that cannot produce a record is likewise skipped.
//! Corruption must never prevent the map from loading.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drawable::Drawable;

/// Geometry types the drawing tools can produce.
///
/// Rectangles export as `Polygon`; circles are not supported by the tool
/// configuration and never appear in persisted data.
const SUPPORTED_GEOMETRIES: [&str; 6] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

/// A GeoJSON-style geometry object: a type tag plus raw coordinates.
///
/// Coordinates are kept as an opaque [`serde_json::Value`] so that arbitrary
/// nesting (positions, rings, multi-geometries) round-trips byte-stably
/// without this crate re-modelling the GeoJSON coordinate grammar.
///
/// # Examples
///
/// ```
/// use aoi_map::codec::Geometry;
/// use serde_json::json;
///
/// let geometry = Geometry {
///     kind: "Point".to_string(),
///     coordinates: json!([10.0, 51.0]),
/// };
/// let text = serde_json::to_string(&geometry).unwrap();
/// assert_eq!(text, r#"{"type":"Point","coordinates":[10.0,51.0]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry type tag (`Point`, `Polygon`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Raw GeoJSON coordinates array.
    pub coordinates: Value,
}

/// The persisted, serializable form of one drawn AOI.
///
/// This is the unit of the stored blob: a self-describing Feature object
/// carrying its geometry and an optional property bag. Identity is
/// structural; the core assigns no stable IDs.
///
/// # Examples
///
/// ```
/// use aoi_map::codec::GeometryRecord;
/// use serde_json::json;
///
/// let record: GeometryRecord = serde_json::from_value(json!({
///     "type": "Feature",
///     "geometry": { "type": "Point", "coordinates": [10.0, 51.0] },
///     "properties": {}
/// }))
/// .unwrap();
/// assert_eq!(record.kind, "Feature");
/// assert_eq!(record.geometry.kind, "Point");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    /// Record type tag; always `Feature` for drawable records.
    #[serde(rename = "type")]
    pub kind: String,

    /// The geometry payload.
    pub geometry: Geometry,

    /// Optional property bag carried alongside the geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, Value>>,
}

impl GeometryRecord {
    /// Builds a Feature record with an empty property bag, the shape the
    /// drawing tools emit.
    ///
    /// # Examples
    ///
    /// ```
    /// use aoi_map::codec::GeometryRecord;
    /// use serde_json::json;
    ///
    /// let record = GeometryRecord::feature("Point", json!([10.0, 51.0]));
    /// assert_eq!(record.kind, "Feature");
    /// assert!(record.properties.as_ref().unwrap().is_empty());
    /// ```
    pub fn feature(geometry_kind: &str, coordinates: Value) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: geometry_kind.to_string(),
                coordinates,
            },
            properties: Some(serde_json::Map::new()),
        }
    }
}

/// Reasons a geometry record cannot back a drawable layer.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The record's type tag is not `Feature`.
    #[error("record is not a Feature: {kind}")]
    NotAFeature {
        /// The type tag that was found.
        kind: String,
    },

    /// The geometry type is outside the drawable set.
    #[error("unsupported geometry type: {kind}")]
    UnsupportedGeometry {
        /// The geometry type that was found.
        kind: String,
    },

    /// The geometry carries no coordinate array.
    #[error("geometry has no coordinate array")]
    MissingCoordinates,
}

/// Checks whether a record can back a drawable layer.
///
/// # Errors
///
/// Returns the first violated constraint: non-`Feature` type tag,
/// unsupported geometry type, or a missing coordinate array.
pub fn validate(record: &GeometryRecord) -> Result<(), CodecError> {
    if record.kind != "Feature" {
        return Err(CodecError::NotAFeature {
            kind: record.kind.clone(),
        });
    }
    if !SUPPORTED_GEOMETRIES.contains(&record.geometry.kind.as_str()) {
        return Err(CodecError::UnsupportedGeometry {
            kind: record.geometry.kind.clone(),
        });
    }
    if !record.geometry.coordinates.is_array() {
        return Err(CodecError::MissingCoordinates);
    }
    Ok(())
}

/// Stateless converter between [`GeometryRecord`] sequences and [`Drawable`]
/// layer objects.
pub struct GeometryCodec;

impl GeometryCodec {
    /// Maps each drawable to its geometry record.
    ///
    /// Drawables that cannot produce a record are skipped silently; a
    /// partial export is acceptable and preferable to failing the save.
    ///
    /// # Examples
    ///
    /// ```
    /// use aoi_map::codec::{GeometryCodec, GeometryRecord};
    /// use aoi_map::drawable::Drawable;
    /// use serde_json::json;
    ///
    /// let record = GeometryRecord::feature("Point", json!([10.0, 51.0]));
    /// let drawable = Drawable::from_record(record.clone()).unwrap();
    /// let encoded = GeometryCodec::encode([&drawable]);
    /// assert_eq!(encoded, vec![record]);
    /// ```
    pub fn encode<'a, I>(drawables: I) -> Vec<GeometryRecord>
    where
        I: IntoIterator<Item = &'a Drawable>,
    {
        drawables
            .into_iter()
            .filter_map(|drawable| {
                let record = drawable.to_record();
                if record.is_none() {
                    tracing::debug!(layer = %drawable.id(), "skipping unexportable drawable");
                }
                record
            })
            .collect()
    }

    /// Attempts to construct a drawable for each record.
    ///
    /// A malformed record is skipped individually and does not abort
    /// decoding the rest. An empty input yields an empty output.
    ///
    /// # Examples
    ///
    /// ```
    /// use aoi_map::codec::{GeometryCodec, GeometryRecord};
    /// use serde_json::json;
    ///
    /// let good = GeometryRecord::feature("Point", json!([10.0, 51.0]));
    /// let bad = GeometryRecord::feature("Circle", json!([0.0, 0.0]));
    /// let drawables = GeometryCodec::decode(vec![good, bad]);
    /// assert_eq!(drawables.len(), 1);
    /// ```
    pub fn decode(records: Vec<GeometryRecord>) -> Vec<Drawable> {
        records
            .into_iter()
            .filter_map(|record| match Drawable::from_record(record) {
                Ok(drawable) => Some(drawable),
                Err(error) => {
                    tracing::debug!(%error, "skipping malformed geometry record");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn point(x: f64, y: f64) -> GeometryRecord {
        GeometryRecord::feature("Point", json!([x, y]))
    }

    #[test]
    fn validate_accepts_drawable_feature() {
        assert!(validate(&point(10.0, 51.0)).is_ok());
    }

    #[test]
    fn validate_rejects_non_feature() {
        let mut record = point(10.0, 51.0);
        record.kind = "FeatureCollection".to_string();
        assert!(matches!(
            validate(&record),
            Err(CodecError::NotAFeature { kind }) if kind == "FeatureCollection"
        ));
    }

    #[test]
    fn validate_rejects_unsupported_geometry() {
        let record = GeometryRecord::feature("Circle", json!([0.0, 0.0]));
        assert!(matches!(
            validate(&record),
            Err(CodecError::UnsupportedGeometry { kind }) if kind == "Circle"
        ));
    }

    #[test]
    fn validate_rejects_null_coordinates() {
        let record = GeometryRecord::feature("Point", Value::Null);
        assert!(matches!(
            validate(&record),
            Err(CodecError::MissingCoordinates)
        ));
    }

    #[test]
    fn decode_skips_malformed_and_keeps_rest() {
        let records = vec![
            point(10.0, 51.0),
            GeometryRecord::feature("Blob", json!([])),
            point(7.1, 50.7),
        ];
        let drawables = GeometryCodec::decode(records);
        assert_eq!(drawables.len(), 2);
    }

    #[test]
    fn decode_empty_yields_empty() {
        assert!(GeometryCodec::decode(Vec::new()).is_empty());
    }

    #[test]
    fn encode_preserves_collection_order() {
        let first = Drawable::from_record(point(1.0, 1.0)).unwrap();
        let second = Drawable::from_record(point(2.0, 2.0)).unwrap();
        let encoded = GeometryCodec::encode([&first, &second]);
        assert_eq!(encoded[0].geometry.coordinates, json!([1.0, 1.0]));
        assert_eq!(encoded[1].geometry.coordinates, json!([2.0, 2.0]));
    }

    #[test]
    fn record_serializes_in_feature_shape() {
        let record = point(10.0, 51.0);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [10.0, 51.0] },
                "properties": {}
            })
        );
    }

    #[test]
    fn record_without_properties_round_trips() {
        let value = json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }
        });
        let record: GeometryRecord = serde_json::from_value(value.clone()).unwrap();
        assert!(record.properties.is_none());
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    // ---- round-trip property ----

    fn arb_coordinates(kind: &str) -> BoxedStrategy<Value> {
        let position = (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(x, y)| json!([x, y]));
        match kind {
            "Point" => position.boxed(),
            "LineString" | "MultiPoint" => proptest::collection::vec(position, 2..6)
                .prop_map(Value::Array)
                .boxed(),
            _ => proptest::collection::vec(position, 3..6)
                .prop_map(|ring| json!([ring]))
                .boxed(),
        }
    }

    fn arb_record() -> impl Strategy<Value = GeometryRecord> {
        prop_oneof![
            Just("Point"),
            Just("MultiPoint"),
            Just("LineString"),
            Just("Polygon"),
        ]
        .prop_flat_map(|kind| {
            let props = proptest::collection::hash_map("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,12}", 0..4);
            (arb_coordinates(kind), props).prop_map(move |(coordinates, props)| {
                let mut record = GeometryRecord::feature(kind, coordinates);
                record.properties = Some(
                    props
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                );
                record
            })
        })
    }

    proptest! {
        /// Any valid record survives decode -> encode with geometry and
        /// properties intact.
        #[test]
        fn round_trip_preserves_records(records in proptest::collection::vec(arb_record(), 0..8)) {
            let drawables = GeometryCodec::decode(records.clone());
            let encoded = GeometryCodec::encode(drawables.iter());
            prop_assert_eq!(encoded, records);
        }
    }
}
