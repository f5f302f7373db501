use std::collections::BTreeMap;

use plinth_core::math::Point;
use plinth_core::nalgebra::{distance, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate statistics of a single cluster
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterInfo {
    /// The cluster label
    pub id: i64,
    /// Number of member points
    pub size: usize,
    /// Arithmetic mean of all member positions
    pub centroid: Point,
    /// Largest distance from the centroid to any member
    pub radius: f64,
}

/// Computes a [ClusterInfo] for every distinct non-negative label in `labels`. Noise is skipped. The result
/// is sorted by size, largest cluster first; clusters of equal size are ordered by ascending id.
///
/// `labels` must hold one label per point in `points`, as returned by [dbscan](crate::dbscan::dbscan).
///
/// # Examples
///
/// ```
/// # use plinth_core::math::Point;
/// # use plinth_algorithms::cluster_summary::summarize;
/// # use plinth_algorithms::dbscan::NOISE;
/// let points = vec![
///     Point::new(0.0, 0.0, 0.0),
///     Point::new(2.0, 0.0, 0.0),
///     Point::new(9.0, 9.0, 9.0),
/// ];
/// let clusters = summarize(&points, &[0, 0, NOISE]);
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].size, 2);
/// assert_eq!(clusters[0].centroid, Point::new(1.0, 0.0, 0.0));
/// assert_eq!(clusters[0].radius, 1.0);
/// ```
pub fn summarize(points: &[Point], labels: &[i64]) -> Vec<ClusterInfo> {
    debug_assert_eq!(points.len(), labels.len());

    let mut members: BTreeMap<i64, Vec<&Point>> = BTreeMap::new();
    for (point, label) in points.iter().zip(labels.iter()) {
        if *label >= 0 {
            members.entry(*label).or_default().push(point);
        }
    }

    let mut clusters: Vec<ClusterInfo> = members
        .into_iter()
        .map(|(id, cluster_points)| {
            let size = cluster_points.len();
            let sum = cluster_points
                .iter()
                .fold(Vector3::zeros(), |sum, point| sum + point.coords);
            let centroid = Point::from(sum / size as f64);
            let radius = cluster_points
                .iter()
                .map(|point| distance(*point, &centroid))
                .fold(0.0, f64::max);
            ClusterInfo {
                id,
                size,
                centroid,
                radius,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    clusters
}
