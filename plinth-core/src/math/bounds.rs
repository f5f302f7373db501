use nalgebra::{ClosedSub, Point3, Scalar, Vector3};

/// 3D axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB<T: Scalar + PartialOrd> {
    min: Point3<T>,
    max: Point3<T>,
}

impl<T: Scalar + ClosedSub + PartialOrd + Copy> AABB<T> {
    /// Creates a new AABB from the given minimum and maximum coordinates. Panics if the minimum position is
    /// not less than or equal to the maximum position
    /// ```
    /// # use plinth_core::math::AABB;
    /// let bounds = AABB::from_min_max(nalgebra::Point3::new(0.0, 0.0, 0.0), nalgebra::Point3::new(1.0, 1.0, 1.0));
    /// ```
    pub fn from_min_max(min: Point3<T>, max: Point3<T>) -> Self {
        if min.x > max.x || min.y > max.y || min.z > max.z {
            panic!("AABB::from_min_max: Minimum position must be <= maximum position!");
        }
        Self { min, max }
    }

    /// Creates a new AABB from the given minimum and maximum coordinates without checking that min <= max
    pub fn from_min_max_unchecked(min: Point3<T>, max: Point3<T>) -> Self {
        Self { min, max }
    }

    /// Creates a degenerate AABB that contains only `point`
    pub fn from_point(point: &Point3<T>) -> Self {
        Self {
            min: *point,
            max: *point,
        }
    }

    /// Returns the minimum point of this AABB
    pub fn min(&self) -> &Point3<T> {
        &self.min
    }

    /// Returns the maximum point of this AABB
    pub fn max(&self) -> &Point3<T> {
        &self.max
    }

    /// Returns the extent of this AABB, i.e. the size between the minimum and maximum position
    /// ```
    /// # use plinth_core::math::AABB;
    /// let bounds = AABB::from_min_max_unchecked(nalgebra::Point3::new(0.0, 1.0, 2.0), nalgebra::Point3::new(1.0, 3.0, 5.0));
    /// assert_eq!(bounds.extent(), nalgebra::Vector3::new(1.0, 2.0, 3.0));
    /// ```
    pub fn extent(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Returns true if the two bounding boxes intersect. Touching boxes and boxes that are fully contained
    /// within each other count as intersecting
    pub fn intersects(&self, other: &AABB<T>) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
            && (self.min.z <= other.max.z && self.max.z >= other.min.z)
    }

    /// Returns true if the given point is contained within this AABB. Points on the boundary are contained
    pub fn contains(&self, point: &Point3<T>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Computes the smallest AABB that fully contains both `a` and `b`
    /// ```
    /// # use plinth_core::math::AABB;
    /// let bounds_a = AABB::from_min_max_unchecked(nalgebra::Point3::new(0.0, 0.0, 0.0), nalgebra::Point3::new(1.0, 1.0, 1.0));
    /// let bounds_b = AABB::from_min_max_unchecked(nalgebra::Point3::new(2.0, 2.0, 2.0), nalgebra::Point3::new(3.0, 3.0, 3.0));
    /// let merged_bounds = AABB::union(&bounds_a, &bounds_b);
    /// assert_eq!(*merged_bounds.min(), nalgebra::Point3::new(0.0, 0.0, 0.0));
    /// assert_eq!(*merged_bounds.max(), nalgebra::Point3::new(3.0, 3.0, 3.0));
    /// ```
    pub fn union(a: &AABB<T>, b: &AABB<T>) -> Self {
        Self {
            min: Point3::new(
                lesser(a.min.x, b.min.x),
                lesser(a.min.y, b.min.y),
                lesser(a.min.z, b.min.z),
            ),
            max: Point3::new(
                greater(a.max.x, b.max.x),
                greater(a.max.y, b.max.y),
                greater(a.max.z, b.max.z),
            ),
        }
    }

    /// Extends the given AABB so that it contains the given point
    pub fn extend_with_point(bounds: &AABB<T>, point: &Point3<T>) -> AABB<T> {
        Self::union(bounds, &Self::from_point(point))
    }
}

impl AABB<f64> {
    /// Squared distance from `point` to the closest position inside this AABB. Zero if the point lies
    /// inside the box
    /// ```
    /// # use plinth_core::math::AABB;
    /// let bounds = AABB::from_min_max_unchecked(nalgebra::Point3::new(0.0, 0.0, 0.0), nalgebra::Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(bounds.min_distance_squared(&nalgebra::Point3::new(0.5, 0.5, 0.5)), 0.0);
    /// assert_eq!(bounds.min_distance_squared(&nalgebra::Point3::new(3.0, 0.5, -1.0)), 5.0);
    /// ```
    pub fn min_distance_squared(&self, point: &Point3<f64>) -> f64 {
        (0..3)
            .map(|axis| {
                let value = point[axis];
                let gap = if value < self.min[axis] {
                    self.min[axis] - value
                } else if value > self.max[axis] {
                    value - self.max[axis]
                } else {
                    0.0
                };
                gap * gap
            })
            .sum()
    }

    /// Does the sphere around `center` with the given `radius` touch this AABB?
    pub fn intersects_sphere(&self, center: &Point3<f64>, radius: f64) -> bool {
        self.min_distance_squared(center) <= radius * radius
    }

    /// The cube of side length `2 * half_extent` centered on `center`
    pub fn around(center: &Point3<f64>, half_extent: f64) -> Self {
        let offset = Vector3::repeat(half_extent);
        Self {
            min: Point3::from(center.coords - offset),
            max: Point3::from(center.coords + offset),
        }
    }
}

impl<T: Scalar + ClosedSub + PartialOrd + Copy> AABB<T> {
    /// Computes the bounding box of all points in `points`. Returns `None` if the iterator is empty
    pub fn from_points<I: IntoIterator<Item = Point3<T>>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| match bounds {
            None => Some(AABB::from_point(&point)),
            Some(bounds) => Some(AABB::extend_with_point(&bounds, &point)),
        })
    }
}

fn lesser<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

fn greater<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_bounds() {
        let points = vec![
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
        ];
        let bounds = AABB::from_points(points).unwrap();
        assert_eq!(*bounds.min(), Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(*bounds.max(), Point3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_collect_empty_bounds() {
        assert!(AABB::<f64>::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_sphere_intersection_at_corner() {
        let bounds = AABB::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let center = Point3::new(2.0, 2.0, 2.0);
        // distance to the corner is sqrt(3)
        assert!(!bounds.intersects_sphere(&center, 1.7));
        assert!(bounds.intersects_sphere(&center, 1.74));
    }

    #[test]
    fn test_around_contains_center() {
        let center = Point3::new(0.25, -3.0, 7.0);
        let cube = AABB::around(&center, 0.5);
        assert!(cube.contains(&center));
        assert_eq!(cube.extent(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    #[should_panic]
    fn test_inverted_bounds_panic() {
        AABB::from_min_max(Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
    }
}
