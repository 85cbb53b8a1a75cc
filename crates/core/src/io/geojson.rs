//! GeoJSON reading
//!
//! Lightweight serde models for RFC 7946 feature collections, covering the
//! subset needed here: feature geometry plus scalar properties. Geometry
//! kinds without a point reduction (e.g. GeometryCollection) come through
//! as features with no geometry and are skipped downstream.

use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::{
    Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct GeoJsonRoot {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<GeoJsonFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Read a GeoJSON feature collection from a file
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path.as_ref())?;
    read_geojson_str(&text)
}

/// Read a GeoJSON feature collection from a string
pub fn read_geojson_str(text: &str) -> Result<FeatureCollection> {
    let root: GeoJsonRoot = serde_json::from_str(text)?;

    if root.kind != "FeatureCollection" {
        return Err(Error::UnsupportedDataType(format!(
            "expected a GeoJSON FeatureCollection, got `{}`",
            root.kind
        )));
    }

    let mut collection = FeatureCollection::new();
    for raw in root.features {
        let mut feature = match raw.geometry.as_ref().and_then(|g| convert_geometry(g)) {
            Some(geometry) => Feature::new(geometry),
            None => Feature::empty(),
        };

        if let Some(props) = raw.properties {
            for (key, value) in props {
                if let Some(attr) = convert_attribute(&value) {
                    feature.set_property(key, attr);
                }
            }
        }

        collection.push(feature);
    }

    Ok(collection)
}

fn convert_attribute(value: &Value) -> Option<AttributeValue> {
    match value {
        Value::Null => Some(AttributeValue::Null),
        Value::Bool(b) => Some(AttributeValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(AttributeValue::Int(i))
            } else {
                n.as_f64().map(AttributeValue::Float)
            }
        }
        Value::String(s) => Some(AttributeValue::String(s.clone())),
        // nested arrays/objects carry no scalar meaning for rasterization
        _ => None,
    }
}

fn convert_geometry(geometry: &GeoJsonGeometry) -> Option<Geometry<f64>> {
    let coords = &geometry.coordinates;
    match geometry.kind.as_str() {
        "Point" => position(coords).map(|c| Geometry::Point(Point::from(c))),
        "MultiPoint" => positions(coords).map(|cs| {
            Geometry::MultiPoint(MultiPoint::from(
                cs.into_iter().map(Point::from).collect::<Vec<_>>(),
            ))
        }),
        "LineString" => positions(coords).map(|cs| Geometry::LineString(LineString::from(cs))),
        "MultiLineString" => lines(coords).map(|ls| {
            Geometry::MultiLineString(MultiLineString::new(
                ls.into_iter().map(LineString::from).collect(),
            ))
        }),
        "Polygon" => lines(coords).and_then(polygon_from_rings).map(Geometry::Polygon),
        "MultiPolygon" => coords.as_array().map(|polys| {
            Geometry::MultiPolygon(MultiPolygon::new(
                polys
                    .iter()
                    .filter_map(lines)
                    .filter_map(polygon_from_rings)
                    .collect(),
            ))
        }),
        _ => None,
    }
}

fn polygon_from_rings(mut rings: Vec<Vec<Coord<f64>>>) -> Option<Polygon<f64>> {
    if rings.is_empty() {
        return None;
    }
    let exterior = LineString::from(rings.remove(0));
    let interiors = rings.into_iter().map(LineString::from).collect();
    Some(Polygon::new(exterior, interiors))
}

/// A single `[x, y, ...]` position
fn position(value: &Value) -> Option<Coord<f64>> {
    let arr = value.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    Some(Coord {
        x: arr[0].as_f64()?,
        y: arr[1].as_f64()?,
    })
}

/// An array of positions
fn positions(value: &Value) -> Option<Vec<Coord<f64>>> {
    value.as_array()?.iter().map(position).collect()
}

/// An array of position arrays (line strings / polygon rings)
fn lines(value: &Value) -> Option<Vec<Vec<Coord<f64>>>> {
    value.as_array()?.iter().map(positions).collect()
}
