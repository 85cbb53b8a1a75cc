//! Padded extent and grid geometry
//!
//! `Bounds` is the axis-aligned rectangle the output grid covers. Derived
//! from a point set it is the tight bounding box padded outward by the
//! search radius on all four sides, so cells near the rectangle edge still
//! find neighbors lying just outside the unpadded box.

use crate::SamplePoint;
use spatialkde_core::{Error, Result};

/// An axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Tight bounding box of `points`, padded by `radius` on every side.
    ///
    /// A single point yields a zero-area box that becomes valid once
    /// padded. Fails with [`Error::EmptyInput`] for an empty slice.
    pub fn from_points(points: &[SamplePoint], radius: f64) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyInput(
                "cannot derive bounds from an empty point set".into(),
            ));
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Ok(Self {
            min_x: min_x - radius,
            min_y: min_y - radius,
            max_x: max_x + radius,
            max_y: max_y + radius,
        })
    }

    /// All x coordinates of cell top-left corners for given `pixel_size`
    pub fn x_coords(&self, pixel_size: f64) -> Result<Vec<f64>> {
        coords(self.min_x, self.max_x, pixel_size)
    }

    /// All y coordinates of cell bottom-left corners for given `pixel_size`
    pub fn y_coords(&self, pixel_size: f64) -> Result<Vec<f64>> {
        coords(self.min_y, self.max_y, pixel_size)
    }

    /// Grid width (columns) for given `pixel_size`
    pub fn width(&self, pixel_size: f64) -> Result<usize> {
        steps(self.min_x, self.max_x, pixel_size)
    }

    /// Grid height (rows) for given `pixel_size`
    pub fn height(&self, pixel_size: f64) -> Result<usize> {
        steps(self.min_y, self.max_y, pixel_size)
    }
}

/// Number of fixed-size steps covering the half-open interval [min, max)
fn steps(min: f64, max: f64, pixel_size: f64) -> Result<usize> {
    if !(pixel_size > 0.0) || !pixel_size.is_finite() {
        return Err(Error::invalid_parameter(
            "pixel_size",
            pixel_size,
            "must be a positive number",
        ));
    }

    let span = max - min;
    if span <= 0.0 {
        return Ok(0);
    }
    Ok((span / pixel_size).ceil() as usize)
}

/// Arithmetic progression min, min + s, min + 2s, ... stopping before max
fn coords(min: f64, max: f64, pixel_size: f64) -> Result<Vec<f64>> {
    let n = steps(min, max, pixel_size)?;
    Ok((0..n).map(|i| min + i as f64 * pixel_size).collect())
}
