//! Typed point/weight extraction from vector features
//!
//! Reduces every feature to a weighted sample point: point geometries are
//! used directly, other geometry kinds contribute their centroid. The
//! name-based attribute lookup happens here, once; the density evaluator
//! only ever sees flat `SamplePoint`s.

use crate::SamplePoint;
use geo::Centroid;
use geo_types::{Geometry, Point};
use spatialkde_core::vector::{AttributeValue, FeatureCollection};
use spatialkde_core::{Error, Result};

/// Extract weighted sample points from a feature collection.
///
/// When `weight_field` is given it must name an attribute present on at
/// least one feature ([`Error::InvalidParameter`] otherwise); features
/// where the attribute is missing or non-numeric get a NaN weight and are
/// excluded by the density evaluator. Without a weight field every point
/// weighs 1.0.
///
/// Features without geometry, or with a geometry kind that has no
/// centroid, are skipped.
pub fn sample_points(
    features: &FeatureCollection,
    weight_field: Option<&str>,
) -> Result<Vec<SamplePoint>> {
    if let Some(field) = weight_field {
        if !features.has_property(field) {
            return Err(Error::invalid_parameter(
                "weight_field",
                field,
                "attribute not found on any input feature",
            ));
        }
    }

    let mut points = Vec::with_capacity(features.len());
    for feature in features.iter() {
        let Some(center) = feature.geometry.as_ref().and_then(centroid) else {
            continue;
        };

        let weight = match weight_field {
            Some(field) => feature
                .get_property(field)
                .and_then(AttributeValue::as_f64)
                .unwrap_or(f64::NAN),
            None => 1.0,
        };

        points.push(SamplePoint::weighted(center.x(), center.y(), weight));
    }

    Ok(points)
}

/// Centroid of a geometry, `None` for kinds without one
fn centroid(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    match geometry {
        Geometry::Point(p) => Some(*p),
        Geometry::Line(l) => Some(l.centroid()),
        Geometry::LineString(ls) => ls.centroid(),
        Geometry::Polygon(p) => p.centroid(),
        Geometry::MultiPoint(mp) => mp.centroid(),
        Geometry::MultiLineString(mls) => mls.centroid(),
        Geometry::MultiPolygon(mp) => mp.centroid(),
        Geometry::Rect(r) => Some(r.centroid()),
        _ => None,
    }
}
