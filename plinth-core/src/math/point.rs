use std::fmt::{self, Display};
use std::str::FromStr;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single vertex position. Points are plain values and are only ever compared by their coordinates
pub type Point = Point3<f64>;

/// Squared euclidean distance between two points
#[inline]
pub fn distance_squared(a: &Point, b: &Point) -> f64 {
    (a - b).norm_squared()
}

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in x→y→z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The axis a tree level splits on. Cycles x→y→z→x… with increasing `depth`
    #[inline]
    pub fn for_depth(depth: usize) -> Self {
        Self::ALL[depth % 3]
    }

    /// Component index of this axis (0 for x, 1 for y, 2 for z)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The coordinate of `point` along this axis
    #[inline]
    pub fn coordinate(self, point: &Point) -> f64 {
        point[self.index()]
    }

    /// The two other axes, in ascending order. If `self` is the up axis, these span the horizontal plane
    pub fn horizontal_axes(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    /// Copy of `point` with the coordinate along this axis set to zero
    ///
    /// ```
    /// # use plinth_core::math::{Axis, Point};
    /// let flat = Axis::Y.project_out(&Point::new(1.0, 5.0, 2.0));
    /// assert_eq!(flat, Point::new(1.0, 0.0, 2.0));
    /// ```
    #[inline]
    pub fn project_out(self, point: &Point) -> Point {
        let mut projected = *point;
        projected[self.index()] = 0.0;
        projected
    }
}

impl Default for Axis {
    fn default() -> Self {
        Axis::Y
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("Unknown axis '{}', expected one of x, y, z", other)),
        }
    }
}
