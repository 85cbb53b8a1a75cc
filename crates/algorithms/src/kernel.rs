//! Quartic kernel evaluation
//!
//! The Quartic kernel `(1 - (d/r)^2)^2` decays from 1 at the query point
//! to exactly 0 at the search radius. The scaled variant multiplies by a
//! normalizing constant so the surface integrates like a probability
//! density.
//!
//! Reference:
//! Silverman, B.W. (1986). Density Estimation for Statistics and Data
//! Analysis; scaling constant after Wand & Jones (1995), p. 175.

use std::f64::consts::PI;

/// Raw Quartic kernel value for a single neighbor
#[inline]
pub fn quartic_raw(distance: f64, radius: f64, weight: f64) -> f64 {
    let t = distance / radius;
    weight * (1.0 - t * t).powi(2)
}

/// Mathematically scaled Quartic kernel value for a single neighbor
#[inline]
pub fn quartic_scaled(distance: f64, radius: f64, weight: f64) -> f64 {
    // Normalizing constant
    let k = 116.0 / (5.0 * PI * radius * radius);

    let t = distance / radius;
    weight * k * (15.0 / 16.0) * (1.0 - t * t).powi(2)
}

/// Quartic kernel density estimate for one grid cell.
///
/// Sums the per-neighbor contribution over all `distances` (the neighbors
/// already found within the search radius). `weights` must parallel
/// `distances` when given; `None` means uniform weights of 1.0.
///
/// Callers guarantee `radius > 0` and non-negative distances; neighbors
/// at exactly `distance == radius` contribute 0 through the formula.
pub fn quartic(distances: &[f64], weights: Option<&[f64]>, radius: f64, scaled: bool) -> f64 {
    debug_assert!(radius > 0.0);
    debug_assert!(weights.map_or(true, |w| w.len() == distances.len()));

    let kernel = if scaled { quartic_scaled } else { quartic_raw };

    match weights {
        Some(weights) => distances
            .iter()
            .zip(weights)
            .map(|(&d, &w)| kernel(d, radius, w))
            .sum(),
        None => distances.iter().map(|&d| kernel(d, radius, 1.0)).sum(),
    }
}
