use plinth_core::math::{Axis, Point, AABB};

/// Calculate the bounding box of the given `points`. Returns `None` if there are no points
pub fn calculate_bounds(points: &[Point]) -> Option<AABB<f64>> {
    AABB::from_points(points.iter().copied())
}

/// Returns the minimum and maximum coordinate of `points` along `axis`. Returns `None` if there are no points
pub fn axis_range(points: &[Point], axis: Axis) -> Option<(f64, f64)> {
    let mut minmax = None;
    for value in points.iter().map(|point| axis.coordinate(point)) {
        match minmax {
            None => minmax = Some((value, value)),
            Some((old_min, old_max)) => {
                minmax = Some((value.min(old_min), value.max(old_max)));
            }
        }
    }
    minmax
}
