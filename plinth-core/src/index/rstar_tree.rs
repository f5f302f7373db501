use std::fmt;

use rstar::primitives::GeomWithData;
use rstar::{RStarInsertionStrategy, RTree, RTreeParams, AABB as Envelope};

use super::{is_valid_radius, SpatialIndex};
use crate::math::{distance_squared, Point, AABB};

/// `RTreeParams` for nodes with at most 16 entries
#[derive(Debug, Clone, Copy)]
pub struct SixteenEntries;

impl RTreeParams for SixteenEntries {
    const MIN_SIZE: usize = 4;
    const MAX_SIZE: usize = 16;
    const REINSERTION_COUNT: usize = 5;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

type IndexedPosition = GeomWithData<[f64; 3], usize>;

/// Height-balanced R*-tree over the points, bulk loaded in one go.
///
/// Queries first collect every entry inside the axis-aligned cube of side `2 * radius` around the target
/// and then drop the cube corners with an exact squared distance test
pub struct RStarIndex {
    points: Vec<Point>,
    tree: RTree<IndexedPosition, SixteenEntries>,
}

impl RStarIndex {
    /// Height of the underlying R*-tree. An empty tree has height 1 (just the root)
    pub fn height(&self) -> usize {
        fn node_height(node: &rstar::ParentNode<IndexedPosition>) -> usize {
            1 + node
                .children()
                .iter()
                .map(|child| match child {
                    rstar::RTreeNode::Parent(parent) => node_height(parent),
                    rstar::RTreeNode::Leaf(_) => 0,
                })
                .max()
                .unwrap_or(0)
        }
        node_height(self.tree.root())
    }
}

impl fmt::Debug for RStarIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RStarIndex")
            .field("len", &self.points.len())
            .field("height", &self.height())
            .finish()
    }
}

impl SpatialIndex for RStarIndex {
    fn build(points: &[Point]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(id, point)| GeomWithData::new([point.x, point.y, point.z], id))
            .collect();
        Self {
            points: points.to_vec(),
            tree: RTree::bulk_load_with_params(entries),
        }
    }

    fn radius_query(&self, target: &Point, radius: f64) -> Vec<usize> {
        if !is_valid_radius(radius) {
            return vec![];
        }
        let cube = AABB::around(target, radius);
        let (min, max) = (cube.min(), cube.max());
        let query_box = Envelope::from_corners([min.x, min.y, min.z], [max.x, max.y, max.z]);
        let radius_squared = radius * radius;

        self.tree
            .locate_in_envelope_intersecting(&query_box)
            .map(|entry| entry.data)
            .filter(|id| distance_squared(&self.points[*id], target) <= radius_squared)
            .collect()
    }

    fn points(&self) -> &[Point] {
        &self.points
    }
}
