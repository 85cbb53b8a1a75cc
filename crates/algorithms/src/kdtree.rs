//! 2D k-d tree for fixed-radius neighbor queries
//!
//! Built once over all sample points in O(n log n), then queried once per
//! grid cell. Replaces the O(n·m) brute-force scan of every cell against
//! every point, which is only acceptable for toy inputs.
//!
//! The tree is stored implicitly: `build` partitions the point slice so
//! that the median of every subrange sits at its midpoint, alternating
//! split axes per level. Queries recurse over (lo, hi) subranges and
//! return distance and weight together, so callers never recompute
//! distances.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used for
//! associative searching. CACM, 18(9).

use crate::SamplePoint;

/// A static 2D k-d tree over sample points.
#[derive(Debug)]
pub struct KdTree {
    points: Vec<SamplePoint>,
}

/// A neighbor found within the search radius
#[derive(Debug, Clone, Copy)]
pub struct Neighbour {
    /// Euclidean distance from the query point
    pub distance: f64,
    /// The neighbor's weight
    pub weight: f64,
}

#[inline]
fn axis_key(p: &SamplePoint, axis: u8) -> f64 {
    if axis == 0 {
        p.x
    } else {
        p.y
    }
}

impl KdTree {
    /// Build a k-d tree, taking ownership of the points.
    pub fn build(mut points: Vec<SamplePoint>) -> Self {
        partition(&mut points, 0);
        Self { points }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find all points within `radius` of (qx, qy), boundary inclusive.
    ///
    /// Results are in no particular order. A non-positive radius finds
    /// nothing.
    pub fn within_radius(&self, qx: f64, qy: f64, radius: f64) -> Vec<Neighbour> {
        let mut found = Vec::new();
        if self.points.is_empty() || radius <= 0.0 {
            return found;
        }

        self.collect_within(
            0,
            self.points.len(),
            0,
            qx,
            qy,
            radius,
            radius * radius,
            &mut found,
        );
        found
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_within(
        &self,
        lo: usize,
        hi: usize,
        axis: u8,
        qx: f64,
        qy: f64,
        radius: f64,
        radius_sq: f64,
        found: &mut Vec<Neighbour>,
    ) {
        if lo >= hi {
            return;
        }

        let mid = lo + (hi - lo) / 2;
        let p = &self.points[mid];

        let dist_sq = p.dist_sq(qx, qy);
        if dist_sq <= radius_sq {
            found.push(Neighbour {
                distance: dist_sq.sqrt(),
                weight: p.weight,
            });
        }

        let q_axis = if axis == 0 { qx } else { qy };
        let p_axis = axis_key(p, axis);
        let next = axis ^ 1;

        // left subrange holds keys <= p_axis, right subrange keys >= p_axis
        if q_axis - radius <= p_axis {
            self.collect_within(lo, mid, next, qx, qy, radius, radius_sq, found);
        }
        if q_axis + radius >= p_axis {
            self.collect_within(mid + 1, hi, next, qx, qy, radius, radius_sq, found);
        }
    }
}

/// Recursively move the median of every subrange to its midpoint,
/// alternating split axes per level.
fn partition(points: &mut [SamplePoint], axis: u8) {
    if points.len() <= 1 {
        return;
    }

    let mid = points.len() / 2;
    points.select_nth_unstable_by(mid, |a, b| axis_key(a, axis).total_cmp(&axis_key(b, axis)));

    let next = axis ^ 1;
    let (left, right) = points.split_at_mut(mid);
    partition(left, next);
    partition(&mut right[1..], next);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::weighted(2.0, 3.0, 10.0),
            SamplePoint::weighted(5.0, 4.0, 20.0),
            SamplePoint::weighted(9.0, 6.0, 30.0),
            SamplePoint::weighted(4.0, 7.0, 40.0),
            SamplePoint::weighted(8.0, 1.0, 50.0),
            SamplePoint::weighted(7.0, 2.0, 60.0),
            SamplePoint::weighted(1.0, 8.0, 70.0),
            SamplePoint::weighted(6.0, 5.0, 80.0),
        ]
    }

    fn brute_force(points: &[SamplePoint], qx: f64, qy: f64, radius: f64) -> Vec<f64> {
        let mut dists: Vec<f64> = points
            .iter()
            .filter(|p| p.dist_sq(qx, qy) <= radius * radius)
            .map(|p| p.dist(qx, qy))
            .collect();
        dists.sort_by(f64::total_cmp);
        dists
    }

    #[test]
    fn test_build_and_size() {
        let tree = KdTree::build(sample_points());
        assert_eq!(tree.len(), 8);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.within_radius(0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_within_radius_matches_brute_force() {
        let points = sample_points();
        let tree = KdTree::build(points.clone());

        for qx in 0..10 {
            for qy in 0..10 {
                let qx = qx as f64 + 0.5;
                let qy = qy as f64 + 0.5;

                for radius in [0.5, 2.0, 5.0, 20.0] {
                    let mut dists: Vec<f64> = tree
                        .within_radius(qx, qy, radius)
                        .iter()
                        .map(|n| n.distance)
                        .collect();
                    dists.sort_by(f64::total_cmp);

                    let expected = brute_force(&points, qx, qy, radius);
                    assert_eq!(
                        dists.len(),
                        expected.len(),
                        "count mismatch at ({}, {}) r={}",
                        qx,
                        qy,
                        radius
                    );
                    for (a, b) in dists.iter().zip(&expected) {
                        assert!((a - b).abs() < 1e-10);
                    }
                }
            }
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        // point at exact distance 5 from the query (3-4-5 triangle)
        let tree = KdTree::build(vec![SamplePoint::weighted(3.0, 4.0, 2.0)]);
        let found = tree.within_radius(0.0, 0.0, 5.0);

        assert_eq!(found.len(), 1);
        assert!((found[0].distance - 5.0).abs() < 1e-12);
        assert_eq!(found[0].weight, 2.0);
    }

    #[test]
    fn test_zero_radius_finds_nothing() {
        let tree = KdTree::build(sample_points());
        assert!(tree.within_radius(5.0, 4.0, 0.0).is_empty());
    }

    #[test]
    fn test_duplicate_points_all_found() {
        let points = vec![
            SamplePoint::weighted(1.0, 1.0, 1.0),
            SamplePoint::weighted(1.0, 1.0, 2.0),
            SamplePoint::weighted(1.0, 1.0, 3.0),
        ];
        let tree = KdTree::build(points);

        let found = tree.within_radius(1.0, 1.0, 0.1);
        assert_eq!(found.len(), 3);

        let weight_sum: f64 = found.iter().map(|n| n.weight).sum();
        assert_eq!(weight_sum, 6.0);
    }

    #[test]
    fn test_collinear_points() {
        let points: Vec<SamplePoint> = (0..10)
            .map(|i| SamplePoint::new(i as f64, 0.0))
            .collect();
        let tree = KdTree::build(points.clone());

        let found = tree.within_radius(4.5, 0.0, 1.0);
        assert_eq!(found.len(), brute_force(&points, 4.5, 0.0, 1.0).len());
    }

    #[test]
    fn test_large_dataset_matches_brute_force() {
        let points: Vec<SamplePoint> = (0..1000)
            .map(|i| {
                let x = ((i * 7 + 13) % 100) as f64;
                let y = ((i * 11 + 37) % 100) as f64;
                SamplePoint::weighted(x, y, (i % 5) as f64)
            })
            .collect();
        let tree = KdTree::build(points.clone());
        assert_eq!(tree.len(), 1000);

        for (qx, qy, radius) in [(50.0, 50.0, 7.5), (0.0, 0.0, 30.0), (99.5, 12.5, 3.0)] {
            let found = tree.within_radius(qx, qy, radius);
            let expected = brute_force(&points, qx, qy, radius);
            assert_eq!(found.len(), expected.len());
        }
    }
}
