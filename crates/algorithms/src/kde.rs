//! Quartic kernel density surface over a regular grid
//!
//! The grid evaluator: derives the padded output extent, builds a k-d
//! tree over the sample points, and evaluates the quartic kernel at every
//! cell center. Cells with no neighbor inside the search radius receive
//! the no-data sentinel.
//!
//! The evaluation grid is anchored at the extent minimum and generated
//! bottom-up (ascending y); rows are emitted in flipped order so the
//! returned raster is north-up.

use crate::bounds::Bounds;
use crate::kernel::quartic;
use crate::kdtree::KdTree;
use crate::maybe_rayon::*;
use crate::SamplePoint;
use spatialkde_core::raster::{GeoTransform, Raster};
use spatialkde_core::{Error, Result};

/// No-data sentinel for cells with zero in-radius neighbors
pub const NODATA: f64 = -9999.0;

/// Parameters for kernel density estimation
#[derive(Debug, Clone)]
pub struct KdeParams {
    /// Search radius (bandwidth), same units as the point coordinates.
    /// Also pads the derived extent so edge cells see nearby points.
    pub radius: f64,
    /// Output cell size, same units as the point coordinates
    pub pixel_size: f64,
    /// If true, output mathematically scaled values instead of raw ones
    pub scaled: bool,
    /// Explicit output extent. `None` derives it from the points, padded
    /// by `radius`.
    pub extent: Option<Bounds>,
}

impl Default for KdeParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            pixel_size: 1.0,
            scaled: false,
            extent: None,
        }
    }
}

/// Compute a Quartic kernel density raster from scattered points.
///
/// Points with a non-finite weight (a requested weight attribute that was
/// missing) are excluded entirely, bounds derivation included. Each output
/// cell is the sum of quartic contributions from points within `radius`
/// of the cell center; cells with none are [`NODATA`].
///
/// The returned raster is north-up with origin
/// `(min_x, min_y + height * pixel_size)` and carries [`NODATA`] as its
/// no-data value.
pub fn kernel_density(points: &[SamplePoint], params: &KdeParams) -> Result<Raster<f64>> {
    if !(params.radius > 0.0) || !params.radius.is_finite() {
        return Err(Error::invalid_parameter(
            "radius",
            params.radius,
            "must be a positive number",
        ));
    }
    if !(params.pixel_size > 0.0) || !params.pixel_size.is_finite() {
        return Err(Error::invalid_parameter(
            "pixel_size",
            params.pixel_size,
            "must be a positive number",
        ));
    }
    if points.is_empty() {
        return Err(Error::EmptyInput("no input points".into()));
    }

    let samples: Vec<SamplePoint> = points
        .iter()
        .copied()
        .filter(|p| p.weight.is_finite())
        .collect();
    if samples.is_empty() {
        return Err(Error::EmptyInput(
            "all points dropped due to missing weight values".into(),
        ));
    }

    let radius = params.radius;
    let pixel_size = params.pixel_size;
    let scaled = params.scaled;

    let bounds = match params.extent {
        Some(extent) => extent,
        None => Bounds::from_points(&samples, radius)?,
    };

    // top-left cell corners; centers are offset by half a pixel
    let xs = bounds.x_coords(pixel_size)?;
    let ys = bounds.y_coords(pixel_size)?;
    let (width, height) = (xs.len(), ys.len());
    let half = pixel_size / 2.0;

    let tree = KdTree::build(samples);

    let data: Vec<f64> = (0..height)
        .into_par_iter()
        .flat_map(|row| {
            // raster row 0 is the north edge; the coordinate sequence is
            // ascending, so flip here
            let cy = ys[height - 1 - row] + half;
            let mut row_data = vec![NODATA; width];

            for (col, &x) in xs.iter().enumerate() {
                let cx = x + half;

                let neighbours = tree.within_radius(cx, cy, radius);
                if neighbours.is_empty() {
                    continue;
                }

                let (distances, weights): (Vec<f64>, Vec<f64>) = neighbours
                    .iter()
                    .map(|n| (n.distance, n.weight))
                    .unzip();

                row_data[col] = quartic(&distances, Some(&weights), radius, scaled);
            }

            row_data
        })
        .collect();

    let mut output = Raster::from_vec(data, height, width)?;
    output.set_transform(GeoTransform::new(
        bounds.min_x,
        bounds.min_y + height as f64 * pixel_size,
        pixel_size,
        -pixel_size,
    ));
    output.set_nodata(Some(NODATA));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::quartic_raw;
    use approx::assert_relative_eq;

    fn single_point_params() -> KdeParams {
        KdeParams {
            radius: 10.0,
            pixel_size: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_dimensions_and_transform() {
        let points = vec![SamplePoint::new(0.0, 0.0)];
        let result = kernel_density(&points, &single_point_params()).unwrap();

        // bounds (-10, -10, 10, 10) at pixel 1 -> 20x20
        assert_eq!(result.shape(), (20, 20));

        let gt = result.transform();
        assert_relative_eq!(gt.origin_x, -10.0);
        assert_relative_eq!(gt.origin_y, 10.0);
        assert_relative_eq!(gt.pixel_width, 1.0);
        assert_relative_eq!(gt.pixel_height, -1.0);
        assert!(gt.is_north_up());
        assert_eq!(result.nodata(), Some(NODATA));
    }

    #[test]
    fn test_single_point_cell_values() {
        let points = vec![SamplePoint::new(0.0, 0.0)];
        let result = kernel_density(&points, &single_point_params()).unwrap();

        // the four cells around the origin have centers (±0.5, ±0.5)
        let d = 0.5f64.hypot(0.5);
        let expected = quartic_raw(d, 10.0, 1.0);

        for (row, col) in [(9, 9), (9, 10), (10, 9), (10, 10)] {
            assert_relative_eq!(
                result.get(row, col).unwrap(),
                expected,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_sentinel_outside_radius() {
        let points = vec![SamplePoint::new(0.0, 0.0)];
        let result = kernel_density(&points, &single_point_params()).unwrap();

        // corner cell center (-9.5, 9.5) is ~13.4 from the point
        assert_eq!(result.get(0, 0).unwrap(), NODATA);
        assert_eq!(result.get(19, 19).unwrap(), NODATA);
    }

    #[test]
    fn test_weight_scales_contribution() {
        let unweighted = kernel_density(
            &[SamplePoint::new(0.0, 0.0)],
            &single_point_params(),
        )
        .unwrap();
        let weighted = kernel_density(
            &[SamplePoint::weighted(0.0, 0.0, 3.0)],
            &single_point_params(),
        )
        .unwrap();

        assert_relative_eq!(
            weighted.get(10, 10).unwrap(),
            3.0 * unweighted.get(10, 10).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_matches_brute_force_reference() {
        let points: Vec<SamplePoint> = (0..30)
            .map(|i| {
                let x = ((i * 17 + 11) % 100) as f64;
                let y = ((i * 23 + 41) % 100) as f64;
                SamplePoint::weighted(x, y, 1.0 + (i % 3) as f64)
            })
            .collect();
        let params = KdeParams {
            radius: 15.0,
            pixel_size: 5.0,
            ..Default::default()
        };

        let result = kernel_density(&points, &params).unwrap();
        let (rows, cols) = result.shape();

        for row in 0..rows {
            for col in 0..cols {
                let (cx, cy) = result.pixel_to_geo(col, row);

                let mut sum = 0.0;
                let mut count = 0;
                for p in &points {
                    let d = p.dist(cx, cy);
                    if d <= params.radius {
                        sum += quartic_raw(d, params.radius, p.weight);
                        count += 1;
                    }
                }

                let value = result.get(row, col).unwrap();
                if count == 0 {
                    assert_eq!(value, NODATA, "expected nodata at ({}, {})", row, col);
                } else {
                    assert_relative_eq!(value, sum, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_missing_weight_point_is_excluded() {
        let with_nan = vec![
            SamplePoint::weighted(0.0, 0.0, 2.0),
            SamplePoint::weighted(1.0, 0.0, f64::NAN),
            SamplePoint::weighted(5.0, 5.0, 1.0),
        ];
        let without = vec![
            SamplePoint::weighted(0.0, 0.0, 2.0),
            SamplePoint::weighted(5.0, 5.0, 1.0),
        ];
        let params = KdeParams {
            radius: 8.0,
            pixel_size: 1.0,
            ..Default::default()
        };

        let a = kernel_density(&with_nan, &params).unwrap();
        let b = kernel_density(&without, &params).unwrap();

        assert_eq!(a.shape(), b.shape());
        for row in 0..a.rows() {
            for col in 0..a.cols() {
                assert_relative_eq!(
                    a.get(row, col).unwrap(),
                    b.get(row, col).unwrap(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_scaled_output() {
        let points = vec![SamplePoint::new(0.0, 0.0)];
        let raw = kernel_density(&points, &single_point_params()).unwrap();
        let scaled = kernel_density(
            &points,
            &KdeParams {
                scaled: true,
                ..single_point_params()
            },
        )
        .unwrap();

        let k = 116.0 / (5.0 * std::f64::consts::PI * 100.0);
        for (row, col) in [(10, 10), (5, 10), (0, 0)] {
            let r = raw.get(row, col).unwrap();
            let s = scaled.get(row, col).unwrap();
            if r == NODATA {
                assert_eq!(s, NODATA);
            } else {
                assert_relative_eq!(s, r * k * (15.0 / 16.0), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_explicit_extent() {
        let points = vec![SamplePoint::new(5.0, 9.0)];
        let params = KdeParams {
            radius: 2.0,
            pixel_size: 1.0,
            extent: Some(Bounds::new(0.0, 0.0, 10.0, 10.0)),
            ..Default::default()
        };

        let result = kernel_density(&points, &params).unwrap();
        assert_eq!(result.shape(), (10, 10));

        // the point sits near the north edge: top rows light up,
        // bottom rows stay nodata
        assert!(result.get(0, 5).unwrap() > 0.0);
        assert_eq!(result.get(9, 5).unwrap(), NODATA);
    }

    #[test]
    fn test_empty_input() {
        let result = kernel_density(&[], &KdeParams::default());
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_all_weights_missing() {
        let points = vec![
            SamplePoint::weighted(0.0, 0.0, f64::NAN),
            SamplePoint::weighted(1.0, 1.0, f64::NAN),
        ];
        let result = kernel_density(&points, &KdeParams::default());
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_invalid_radius() {
        let points = vec![SamplePoint::new(0.0, 0.0)];
        for radius in [0.0, -1.0, f64::NAN] {
            let result = kernel_density(
                &points,
                &KdeParams {
                    radius,
                    ..Default::default()
                },
            );
            assert!(matches!(result, Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_invalid_pixel_size() {
        let points = vec![SamplePoint::new(0.0, 0.0)];
        let result = kernel_density(
            &points,
            &KdeParams {
                pixel_size: -0.5,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }
}
