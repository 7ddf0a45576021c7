//! Upstream feature collection to response document.
//!
//! [`translate`] builds a new document from the upstream one; the input is
//! never mutated. Per feature it:
//!
//! 1. reprojects `geometry.coordinates` from LUREF to WGS84, written as
//!    strings with six decimals (`["6.123456", "49.612345"]`)
//! 2. drops the verbose `properties.html` field unless debugging
//! 3. moves the top-level `id` into `properties.mobiliteitid`
//!
//! Documents whose `type` is not `FeatureCollection` pass through unchanged.
//! The translator expects raw upstream input and is applied once per request;
//! feeding it its own output fails, since coordinates are then strings.

use crate::{Result, TranslateError};
use busproxy_geo::Reprojector;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

/// `type` discriminator of documents that get translated.
pub const FEATURE_COLLECTION: &str = "FeatureCollection";

/// Property stripped outside debug mode.
pub const VERBOSE_PROPERTY: &str = "html";

/// Property the upstream top-level `id` is moved to.
pub const ID_PROPERTY: &str = "mobiliteitid";

/// Decimal places kept in output coordinates.
pub const COORDINATE_DECIMALS: usize = 6;

/// Translates a parsed upstream document.
pub fn translate(document: &Value, reprojector: &Reprojector, debug: bool) -> Result<Value> {
    if !is_feature_collection(document) {
        return Ok(document.clone());
    }

    let Some(source) = document.as_object() else {
        return Ok(document.clone());
    };

    let mut output = Map::with_capacity(source.len());
    for (key, value) in source {
        if key == "features" {
            output.insert(key.clone(), translate_features(value, reprojector, debug)?);
        } else {
            output.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Object(output))
}

/// Parses, translates and serializes an upstream body in one go.
pub fn translate_body(body: &[u8], reprojector: &Reprojector, debug: bool) -> Result<Vec<u8>> {
    let document: Value = serde_json::from_slice(body).map_err(TranslateError::InvalidJson)?;
    let translated = translate(&document, reprojector, debug)?;
    serialize(&translated, debug)
}

/// Serializes a document as UTF-8.
///
/// Debug output is pretty-printed with four-space indentation and keys
/// sorted at every level; otherwise the output is compact. Non-ASCII text is
/// written literally in both modes.
pub fn serialize(document: &Value, debug: bool) -> Result<Vec<u8>> {
    if debug {
        let mut buf = Vec::with_capacity(4096);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        SortedKeys(document)
            .serialize(&mut ser)
            .map_err(TranslateError::Serialize)?;
        Ok(buf)
    } else {
        serde_json::to_vec(document).map_err(TranslateError::Serialize)
    }
}

/// True when `document.type == "FeatureCollection"`.
pub fn is_feature_collection(document: &Value) -> bool {
    document.get("type").and_then(Value::as_str) == Some(FEATURE_COLLECTION)
}

/// Number of features in a collection, if it is one.
pub fn feature_count(document: &Value) -> Option<usize> {
    if !is_feature_collection(document) {
        return None;
    }
    document.get("features").and_then(Value::as_array).map(Vec::len)
}

fn translate_features(features: &Value, reprojector: &Reprojector, debug: bool) -> Result<Value> {
    let Some(features) = features.as_array() else {
        return Err(TranslateError::InvalidFeature {
            index: 0,
            reason: "`features` is not an array".to_string(),
        });
    };

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| translate_feature(index, feature, reprojector, debug))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn translate_feature(
    index: usize,
    feature: &Value,
    reprojector: &Reprojector,
    debug: bool,
) -> Result<Value> {
    let Some(source) = feature.as_object() else {
        return Err(TranslateError::InvalidFeature {
            index,
            reason: "not an object".to_string(),
        });
    };

    let (x, y) = coordinate_pair(source).ok_or(TranslateError::MissingGeometry { index })?;
    let position = reprojector.to_geographic(x, y)?;

    let mut output = source.clone();

    if let Some(Value::Object(geometry)) = output.get_mut("geometry") {
        geometry.insert(
            "coordinates".to_string(),
            Value::Array(vec![
                Value::String(format_coordinate(position.x)),
                Value::String(format_coordinate(position.y)),
            ]),
        );
    }

    let mut properties = match output.remove("properties") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(TranslateError::InvalidFeature {
                index,
                reason: "`properties` is not an object".to_string(),
            });
        }
    };

    if !debug {
        properties.remove(VERBOSE_PROPERTY);
    }

    if let Some(id) = output.remove("id") {
        properties.insert(ID_PROPERTY.to_string(), id);
    }

    output.insert("properties".to_string(), Value::Object(properties));
    Ok(Value::Object(output))
}

fn coordinate_pair(feature: &Map<String, Value>) -> Option<(f64, f64)> {
    let coordinates = feature.get("geometry")?.get("coordinates")?.as_array()?;
    match coordinates.as_slice() {
        [x, y, ..] => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

fn format_coordinate(value: f64) -> String {
    format!("{:.*}", COORDINATE_DECIMALS, value)
}

/// Serializes a [`Value`] with object keys in sorted order at every depth,
/// independent of the map's own iteration order.
struct SortedKeys<'a>(&'a Value);

impl Serialize for SortedKeys<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    out.serialize_entry(key, &SortedKeys(value))?;
                }
                out.end()
            }
            Value::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(&SortedKeys(item))?;
                }
                out.end()
            }
            other => other.serialize(serializer),
        }
    }
}
