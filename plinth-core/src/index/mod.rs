//! Fixed-radius neighbour search over a static set of points.
//!
//! All backends implement [SpatialIndex] and return exactly the same set of point ids for the same query.
//! They only differ in how they are built and traversed:
//!
//! - [KdTree]: balanced binary tree, median split on an axis that cycles x→y→z with depth
//! - [RStarIndex]: bulk-loaded R*-tree (via `rstar`) with at most 16 entries per node
//! - [StrTree]: bounding-rectangle tree bulk-loaded top-down with sort-tile-recursive partitioning
//!
//! If the backend is only known at runtime (e.g. from a command line argument), use [AnyIndex] together
//! with [IndexBackend].

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::math::Point;

mod kd_tree;
pub use self::kd_tree::*;

mod rstar_tree;
pub use self::rstar_tree::*;

mod str_tree;
pub use self::str_tree::*;

/// Common interface of all spatial indices. An index owns a copy of the points it was built from and is
/// read-only afterwards
pub trait SpatialIndex {
    /// Builds a new index over `points`. The position of each point within `points` is its id. An empty
    /// slice yields an index that answers every query with an empty result
    fn build(points: &[Point]) -> Self
    where
        Self: Sized;

    /// Returns the ids of all points whose euclidean distance to `target` is at most `radius`. Every id is
    /// returned exactly once, in no particular order. A negative or NaN `radius` yields no ids
    fn radius_query(&self, target: &Point, radius: f64) -> Vec<usize>;

    /// The points this index was built from
    fn points(&self) -> &[Point];

    /// Number of indexed points
    fn len(&self) -> usize {
        self.points().len()
    }

    /// Is this index empty?
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `radius >= 0`, rejecting NaN as well
#[inline]
pub(crate) fn is_valid_radius(radius: f64) -> bool {
    radius >= 0.0
}

/// The available index backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexBackend {
    KdTree,
    RStar,
    Str,
}

impl IndexBackend {
    pub const ALL: [IndexBackend; 3] = [IndexBackend::KdTree, IndexBackend::RStar, IndexBackend::Str];
}

impl Default for IndexBackend {
    fn default() -> Self {
        IndexBackend::KdTree
    }
}

impl Display for IndexBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexBackend::KdTree => write!(f, "kdtree"),
            IndexBackend::RStar => write!(f, "rstar"),
            IndexBackend::Str => write!(f, "str"),
        }
    }
}

impl FromStr for IndexBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kdtree" | "kd-tree" | "kd" => Ok(IndexBackend::KdTree),
            "rstar" | "rtree" | "r-tree" => Ok(IndexBackend::RStar),
            "str" | "rtree-str" => Ok(IndexBackend::Str),
            other => Err(format!(
                "Unknown index backend '{}', expected one of kdtree, rstar, str",
                other
            )),
        }
    }
}

/// A spatial index whose backend is chosen at runtime
#[derive(Debug)]
pub enum AnyIndex {
    KdTree(KdTree),
    RStar(RStarIndex),
    Str(StrTree),
}

impl AnyIndex {
    /// Builds an index over `points` using the given `backend`
    pub fn build_with(backend: IndexBackend, points: &[Point]) -> Self {
        match backend {
            IndexBackend::KdTree => AnyIndex::KdTree(KdTree::build(points)),
            IndexBackend::RStar => AnyIndex::RStar(RStarIndex::build(points)),
            IndexBackend::Str => AnyIndex::Str(StrTree::build(points)),
        }
    }

    /// The backend of this index
    pub fn backend(&self) -> IndexBackend {
        match self {
            AnyIndex::KdTree(_) => IndexBackend::KdTree,
            AnyIndex::RStar(_) => IndexBackend::RStar,
            AnyIndex::Str(_) => IndexBackend::Str,
        }
    }
}

impl SpatialIndex for AnyIndex {
    fn build(points: &[Point]) -> Self {
        Self::build_with(IndexBackend::default(), points)
    }

    fn radius_query(&self, target: &Point, radius: f64) -> Vec<usize> {
        match self {
            AnyIndex::KdTree(index) => index.radius_query(target, radius),
            AnyIndex::RStar(index) => index.radius_query(target, radius),
            AnyIndex::Str(index) => index.radius_query(target, radius),
        }
    }

    fn points(&self) -> &[Point] {
        match self {
            AnyIndex::KdTree(index) => index.points(),
            AnyIndex::RStar(index) => index.points(),
            AnyIndex::Str(index) => index.points(),
        }
    }
}
