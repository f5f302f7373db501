use std::collections::VecDeque;

use log::{debug, info, warn};
use plinth_core::index::SpatialIndex;
use plinth_core::math::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label of a point that has not been looked at yet. Never present in the result of [dbscan]
pub const UNVISITED: i64 = -2;
/// Label of a point that is not density-reachable from any core point
pub const NOISE: i64 = -1;

/// Parameters of the density clustering
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DbscanParams {
    /// Neighbourhood radius (often called epsilon)
    pub radius: f64,
    /// Minimum number of points within `radius`, including the point itself, for a point to be a core point
    pub min_points: usize,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            radius: 0.05,
            min_points: 10,
        }
    }
}

/// Density based clustering (DBSCAN) of `points`. `index` has to be built from the same `points`.
///
/// Returns one label per point: [NOISE] or a cluster id. Cluster ids are dense, start at 0 and are handed
/// out in the order in which clusters are discovered while scanning the points by ascending id.
///
/// A point with at least `min_points` neighbours within `radius` (counting itself) seeds a cluster which
/// then grows breadth-first through all core points reachable from it. Points that were labeled as noise
/// before a cluster reaches them are absorbed as border points but never expand the cluster themselves.
///
/// A `radius` that is not positive is treated as "no point has any neighbours". With `min_points == 0`
/// every point is a core point.
///
/// # Panics
///
/// If `index` returns point ids that are out of bounds for `points`.
///
/// # Examples
///
/// ```
/// # use plinth_core::index::{KdTree, SpatialIndex};
/// # use plinth_core::math::Point;
/// # use plinth_algorithms::dbscan::{dbscan, NOISE};
/// let points = vec![
///     Point::new(0.0, 0.0, 0.0),
///     Point::new(0.1, 0.0, 0.0),
///     Point::new(0.0, 0.1, 0.0),
///     Point::new(5.0, 5.0, 5.0),
/// ];
/// let index = KdTree::build(&points);
/// let labels = dbscan(&points, &index, 0.2, 3);
/// assert_eq!(labels, vec![0, 0, 0, NOISE]);
/// ```
pub fn dbscan<I: SpatialIndex>(
    points: &[Point],
    index: &I,
    radius: f64,
    min_points: usize,
) -> Vec<i64> {
    debug_assert_eq!(
        index.len(),
        points.len(),
        "The index has to be built from the clustered points"
    );

    let num_points = points.len();
    let mut labels = vec![UNVISITED; num_points];
    let searchable = radius > 0.0;
    if !searchable {
        warn!(
            "DBSCAN radius {} is not positive, no point will have any neighbours",
            radius
        );
    }
    let neighbours_of = |id: usize| {
        if searchable {
            index.radius_query(&points[id], radius)
        } else {
            vec![]
        }
    };

    info!(
        "Clustering {} points (radius {}, min points {})",
        num_points, radius, min_points
    );

    let mut cluster_id = 0;
    let mut to_expand = VecDeque::new();
    for id in 0..num_points {
        if labels[id] != UNVISITED {
            continue;
        }

        let neighbours = neighbours_of(id);
        if neighbours.len() < min_points {
            labels[id] = NOISE;
            continue;
        }

        labels[id] = cluster_id;
        to_expand.extend(neighbours.into_iter().filter(|neighbour| *neighbour != id));

        while let Some(current) = to_expand.pop_front() {
            match labels[current] {
                NOISE => {
                    // border point, it does not grow the cluster
                    labels[current] = cluster_id;
                    continue;
                }
                UNVISITED => {}
                _ => continue,
            }

            labels[current] = cluster_id;
            let current_neighbours = neighbours_of(current);
            if current_neighbours.len() >= min_points {
                to_expand.extend(current_neighbours.into_iter().filter(|neighbour| {
                    labels[*neighbour] == UNVISITED || labels[*neighbour] == NOISE
                }));
            }
        }

        cluster_id += 1;

        if id % 100_000 == 0 {
            debug!(
                "DBSCAN progress: {} / {} ({} clusters)",
                id, num_points, cluster_id
            );
        }
    }

    info!("DBSCAN found {} clusters", cluster_id);

    labels
}

/// Same as [dbscan], with the thresholds taken from `params`
pub fn dbscan_with_params<I: SpatialIndex>(
    points: &[Point],
    index: &I,
    params: &DbscanParams,
) -> Vec<i64> {
    dbscan(points, index, params.radius, params.min_points)
}

/// Number of clusters in `labels`, assuming dense cluster ids starting at 0
pub fn cluster_count(labels: &[i64]) -> usize {
    labels
        .iter()
        .copied()
        .max()
        .filter(|max_label| *max_label >= 0)
        .map(|max_label| max_label as usize + 1)
        .unwrap_or(0)
}

/// Number of points in each cluster, indexed by cluster id
pub fn cluster_sizes(labels: &[i64]) -> Vec<usize> {
    let mut sizes = vec![0; cluster_count(labels)];
    for label in labels.iter().copied().filter(|label| *label >= 0) {
        sizes[label as usize] += 1;
    }
    sizes
}

/// Id of the cluster with the most points. Among equally large clusters the smallest id wins. Returns
/// `None` if there are no clusters
pub fn largest_cluster(labels: &[i64]) -> Option<i64> {
    let mut largest: Option<(i64, usize)> = None;
    for (id, size) in cluster_sizes(labels).into_iter().enumerate() {
        match largest {
            Some((_, largest_size)) if largest_size >= size => {}
            _ => largest = Some((id as i64, size)),
        }
    }
    largest.map(|(id, _)| id)
}

/// All points that carry the label `cluster_id`, in their original order
pub fn extract_cluster(points: &[Point], labels: &[i64], cluster_id: i64) -> Vec<Point> {
    points
        .iter()
        .zip(labels.iter())
        .filter(|(_, label)| **label == cluster_id)
        .map(|(point, _)| *point)
        .collect()
}

/// Per-point mask that is `true` for every point that does not belong to `keep_cluster`. This is the format
/// mesh writers expect for dropping vertices
pub fn cluster_removal_mask(labels: &[i64], keep_cluster: i64) -> Vec<bool> {
    labels.iter().map(|label| *label != keep_cluster).collect()
}
