use std::ops::Range;

use float_ord::FloatOrd;

use super::{is_valid_radius, SpatialIndex};
use crate::math::{distance_squared, Axis, Point, AABB};

#[derive(Debug, Clone)]
enum NodeContent {
    /// Range into `StrTree::order`
    Leaf(Range<usize>),
    /// Arena indices of the child nodes
    Internal(Vec<usize>),
}

#[derive(Debug, Clone)]
struct StrNode {
    bounds: AABB<f64>,
    content: NodeContent,
}

/// Bounding-rectangle tree that is bulk loaded top-down with sort-tile-recursive (STR) partitioning.
///
/// A subset with more than `leaf_capacity` points is sorted along an axis that cycles x→y→z with depth
/// and cut into `ceil(sqrt(count / leaf_capacity))` contiguous slices of (almost) equal size, each of
/// which becomes a child. Smaller subsets become leaves. Since every subset is a contiguous range of the
/// sorted id permutation, leaves reference their ids as ranges instead of owning them. All nodes live in
/// a single arena.
#[derive(Debug, Clone)]
pub struct StrTree {
    points: Vec<Point>,
    order: Vec<usize>,
    nodes: Vec<StrNode>,
    root: Option<usize>,
    leaf_capacity: usize,
}

impl StrTree {
    /// Leaf capacity used by [`SpatialIndex::build`]
    pub const DEFAULT_LEAF_CAPACITY: usize = 100;

    /// Builds a new `StrTree` whose leaves hold at most `leaf_capacity` points. A capacity of zero is
    /// treated as one
    ///
    /// ```
    /// # use plinth_core::index::{StrTree, SpatialIndex};
    /// # use plinth_core::math::Point;
    /// let points: Vec<_> = (0..64).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
    /// let tree = StrTree::with_capacity(&points, 4);
    /// assert_eq!(tree.leaf_capacity(), 4);
    /// assert_eq!(tree.radius_query(&Point::new(10.0, 0.0, 0.0), 1.0).len(), 3);
    /// ```
    pub fn with_capacity(points: &[Point], leaf_capacity: usize) -> Self {
        let mut tree = Self {
            points: points.to_vec(),
            order: (0..points.len()).collect(),
            nodes: vec![],
            root: None,
            leaf_capacity: leaf_capacity.max(1),
        };
        if !tree.points.is_empty() {
            let root = tree.build_node(0..tree.order.len(), 0);
            tree.root = Some(root);
        }
        tree
    }

    /// Maximum number of points per leaf
    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    /// Number of nodes (internal nodes and leaves)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn build_node(&mut self, range: Range<usize>, depth: usize) -> usize {
        let count = range.len();
        if count <= self.leaf_capacity {
            return self.push_leaf(range);
        }

        let axis = Axis::for_depth(depth);
        let points = &self.points;
        self.order[range.clone()].sort_unstable_by_key(|id| FloatOrd(axis.coordinate(&points[*id])));

        let num_slices = ((count as f64 / self.leaf_capacity as f64).sqrt().ceil() as usize).max(1);
        let slice_size = (count + num_slices - 1) / num_slices;

        let mut children = Vec::with_capacity(num_slices);
        let mut bounds: Option<AABB<f64>> = None;
        for slice in 0..num_slices {
            let start = range.start + slice * slice_size;
            let end = (start + slice_size).min(range.end);
            if start >= end {
                break;
            }
            let child = self.build_node(start..end, depth + 1);
            let child_bounds = self.nodes[child].bounds;
            bounds = Some(match bounds {
                None => child_bounds,
                Some(bounds) => AABB::union(&bounds, &child_bounds),
            });
            children.push(child);
        }

        // count > leaf_capacity >= 1, so at least one slice was built
        let bounds = bounds.unwrap_or_else(|| AABB::from_point(&self.points[self.order[range.start]]));
        self.nodes.push(StrNode {
            bounds,
            content: NodeContent::Internal(children),
        });
        self.nodes.len() - 1
    }

    fn push_leaf(&mut self, range: Range<usize>) -> usize {
        let first = self.points[self.order[range.start]];
        let bounds = self.order[range.clone()]
            .iter()
            .fold(AABB::from_point(&first), |bounds, id| {
                AABB::extend_with_point(&bounds, &self.points[*id])
            });
        self.nodes.push(StrNode {
            bounds,
            content: NodeContent::Leaf(range),
        });
        self.nodes.len() - 1
    }
}

impl SpatialIndex for StrTree {
    fn build(points: &[Point]) -> Self {
        Self::with_capacity(points, Self::DEFAULT_LEAF_CAPACITY)
    }

    fn radius_query(&self, target: &Point, radius: f64) -> Vec<usize> {
        let mut neighbours = vec![];
        let root = match self.root {
            Some(root) if is_valid_radius(radius) => root,
            _ => return neighbours,
        };
        let radius_squared = radius * radius;

        let mut pending = vec![root];
        while let Some(node_index) = pending.pop() {
            let node = &self.nodes[node_index];
            if !node.bounds.intersects_sphere(target, radius) {
                continue;
            }
            match &node.content {
                NodeContent::Leaf(range) => {
                    neighbours.extend(self.order[range.clone()].iter().copied().filter(|id| {
                        distance_squared(&self.points[*id], target) <= radius_squared
                    }));
                }
                NodeContent::Internal(children) => pending.extend(children.iter().copied()),
            }
        }

        neighbours
    }

    fn points(&self) -> &[Point] {
        &self.points
    }
}
