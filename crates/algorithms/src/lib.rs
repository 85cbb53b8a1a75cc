//! # spatialkde Algorithms
//!
//! Quartic kernel density estimation from scattered 2D points onto a
//! regular raster grid:
//! - `Bounds`: padded extent and grid coordinate sequences
//! - `quartic`: raw / scaled kernel evaluation
//! - `KdTree`: fixed-radius neighbor queries
//! - `kernel_density`: the grid evaluator producing a `Raster<f64>`
//! - `sample_points`: typed point/weight extraction from vector features
//!
//! Distance calculations are planar throughout; inputs in geographic
//! coordinate systems are taken at face value.

pub mod bounds;
pub mod extract;
pub mod kde;
pub mod kernel;
pub mod kdtree;

mod maybe_rayon;

pub use bounds::Bounds;
pub use extract::sample_points;
pub use kde::{kernel_density, KdeParams, NODATA};
pub use kernel::{quartic, quartic_raw, quartic_scaled};
pub use kdtree::{KdTree, Neighbour};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bounds::Bounds;
    pub use crate::extract::sample_points;
    pub use crate::kde::{kernel_density, KdeParams, NODATA};
    pub use crate::kernel::{quartic, quartic_raw, quartic_scaled};
    pub use crate::kdtree::{KdTree, Neighbour};
    pub use crate::SamplePoint;
    pub use spatialkde_core::prelude::*;
}

/// A sample point with x, y coordinates and a weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

impl SamplePoint {
    /// Point with the default uniform weight of 1.0
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, weight: 1.0 }
    }

    /// Point with an explicit weight. A NaN weight marks a point whose
    /// requested weight attribute is missing; such points are excluded
    /// from the density computation entirely.
    pub fn weighted(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }

    /// Squared Euclidean distance to (other_x, other_y)
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to (other_x, other_y)
    #[inline]
    pub fn dist(&self, other_x: f64, other_y: f64) -> f64 {
        self.dist_sq(other_x, other_y).sqrt()
    }
}
