use float_ord::FloatOrd;

use super::{is_valid_radius, SpatialIndex};
use crate::math::{distance_squared, Axis, Point};

/// Balanced 3D k-d tree. Every node holds exactly one point id, the median of its subtree along the split
/// axis, which cycles x→y→z→x… with increasing depth.
///
/// The tree is stored implicitly: `order` is a permutation of all point ids such that the node of the id
/// range `[lo, hi)` sits at `lo + (hi - lo) / 2`, its left subtree is `[lo, mid)` and its right subtree
/// `[mid + 1, hi)`. There are no child pointers and nothing to free besides the two vectors.
///
/// ```
/// # use plinth_core::index::{KdTree, SpatialIndex};
/// # use plinth_core::math::Point;
/// let points = vec![
///     Point::new(0.0, 0.0, 0.0),
///     Point::new(1.0, 0.0, 0.0),
///     Point::new(5.0, 5.0, 5.0),
/// ];
/// let tree = KdTree::build(&points);
/// let mut neighbours = tree.radius_query(&Point::new(0.5, 0.0, 0.0), 0.6);
/// neighbours.sort_unstable();
/// assert_eq!(neighbours, vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<Point>,
    order: Vec<usize>,
}

#[inline]
fn node_position(lo: usize, hi: usize) -> usize {
    lo + (hi - lo) / 2
}

impl KdTree {
    fn partition(points: &[Point], order: &mut [usize]) {
        let mut pending = vec![(0, order.len(), 0)];
        while let Some((lo, hi, depth)) = pending.pop() {
            if hi <= lo {
                continue;
            }
            let axis = Axis::for_depth(depth);
            let median = node_position(lo, hi) - lo;
            order[lo..hi].select_nth_unstable_by_key(median, |id| {
                FloatOrd(axis.coordinate(&points[*id]))
            });
            let mid = lo + median;
            pending.push((lo, mid, depth + 1));
            pending.push((mid + 1, hi, depth + 1));
        }
    }

    /// Depth of the tree, i.e. the number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut count = self.order.len();
        while count > 0 {
            depth += 1;
            count /= 2;
        }
        depth
    }
}

impl SpatialIndex for KdTree {
    fn build(points: &[Point]) -> Self {
        let points = points.to_vec();
        let mut order: Vec<usize> = (0..points.len()).collect();
        Self::partition(&points, &mut order);
        Self { points, order }
    }

    fn radius_query(&self, target: &Point, radius: f64) -> Vec<usize> {
        let mut neighbours = vec![];
        if !is_valid_radius(radius) {
            return neighbours;
        }
        let radius_squared = radius * radius;

        let mut pending = vec![(0, self.order.len(), 0)];
        while let Some((lo, hi, depth)) = pending.pop() {
            if hi <= lo {
                continue;
            }
            let mid = node_position(lo, hi);
            let id = self.order[mid];
            let node = &self.points[id];
            if distance_squared(node, target) <= radius_squared {
                neighbours.push(id);
            }

            let axis = Axis::for_depth(depth);
            let axis_distance = axis.coordinate(target) - axis.coordinate(node);
            let left = (lo, mid, depth + 1);
            let right = (mid + 1, hi, depth + 1);
            let (near, far) = if axis_distance < 0.0 {
                (left, right)
            } else {
                (right, left)
            };

            // the far side can only contain hits if the splitting plane is within reach
            if axis_distance.abs() <= radius {
                pending.push(far);
            }
            pending.push(near);
        }

        neighbours
    }

    fn points(&self) -> &[Point] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;

    #[test]
    fn test_nodes_split_their_subtrees() {
        let points = random_points(257, 1);
        let tree = KdTree::build(&points);

        let mut pending = vec![(0, tree.order.len(), 0)];
        while let Some((lo, hi, depth)) = pending.pop() {
            if hi <= lo {
                continue;
            }
            let mid = node_position(lo, hi);
            let axis = Axis::for_depth(depth);
            let split = axis.coordinate(&points[tree.order[mid]]);
            for id in &tree.order[lo..mid] {
                assert!(axis.coordinate(&points[*id]) <= split);
            }
            for id in &tree.order[mid + 1..hi] {
                assert!(axis.coordinate(&points[*id]) >= split);
            }
            pending.push((lo, mid, depth + 1));
            pending.push((mid + 1, hi, depth + 1));
        }
    }

    #[test]
    fn test_every_id_appears_once() {
        let points = random_points(100, 2);
        let tree = KdTree::build(&points);
        assert_eq!(sorted(tree.order.clone()), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_depth_is_logarithmic() {
        let points = random_points(1023, 4);
        let tree = KdTree::build(&points);
        assert_eq!(tree.depth(), 10);
    }

    #[test]
    fn test_collinear_points() {
        // all points share x and y, only z separates them
        let points: Vec<_> = (0..200)
            .map(|i| Point::new(0.0, 0.0, i as f64 * 0.01))
            .collect();
        let tree = KdTree::build(&points);
        let target = Point::new(0.0, 0.0, 1.0);
        assert_eq!(
            sorted(tree.radius_query(&target, 0.055)),
            sorted(brute_force_query(&points, &target, 0.055))
        );
    }

    #[test]
    fn test_matches_brute_force() {
        let points = random_points(600, 5);
        let tree = KdTree::build(&points);
        for target in points.iter().step_by(13) {
            for radius in [0.0, 0.05, 0.2, 0.7, 3.0].iter().copied() {
                assert_eq!(
                    sorted(tree.radius_query(target, radius)),
                    sorted(brute_force_query(&points, target, radius))
                );
            }
        }
    }
}
