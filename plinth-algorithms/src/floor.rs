use log::{debug, info};
use plinth_core::index::{KdTree, SpatialIndex};
use plinth_core::math::{Axis, Point};

use crate::bounds::axis_range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of [remove_floor]. All ratios are fractions of the height range of the input points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorFilterParams {
    /// Upper end of the floor band, measured from the lowest point
    pub floor_ratio: f64,
    /// Horizontal search radius around each floor point
    pub search_radius: f64,
    /// Lower end of the reference band
    pub mid_start: f64,
    /// Upper end of the reference band
    pub mid_end: f64,
    /// Minimum number of reference band points above a floor point that protect it from removal
    pub min_points_above: usize,
    /// The height axis
    pub up_axis: Axis,
}

impl Default for FloorFilterParams {
    fn default() -> Self {
        Self {
            floor_ratio: 0.15,
            search_radius: 0.1,
            mid_start: 0.10,
            mid_end: 0.40,
            min_points_above: 30,
            up_axis: Axis::Y,
        }
    }
}

/// Absolute heights of the floor band and the reference band of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBands {
    pub min: f64,
    pub max: f64,
    /// Points at or below this height are floor candidates
    pub floor_max: f64,
    pub mid_start: f64,
    pub mid_end: f64,
}

impl HeightBands {
    /// Computes the bands for points whose heights range from `min` to `max`
    pub fn new(min: f64, max: f64, floor_ratio: f64, mid_start: f64, mid_end: f64) -> Self {
        let range = max - min;
        Self {
            min,
            max,
            floor_max: min + range * floor_ratio,
            mid_start: min + range * mid_start,
            mid_end: min + range * mid_end,
        }
    }

    /// Computes the bands of `points` along `params.up_axis`. Returns `None` if `points` is empty
    pub fn from_points(points: &[Point], params: &FloorFilterParams) -> Option<Self> {
        let (min, max) = axis_range(points, params.up_axis)?;
        Some(Self::new(
            min,
            max,
            params.floor_ratio,
            params.mid_start,
            params.mid_end,
        ))
    }

    /// Height range of the points
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_floor(&self, height: f64) -> bool {
        height <= self.floor_max
    }

    pub fn is_reference(&self, height: f64) -> bool {
        height >= self.mid_start && height <= self.mid_end
    }
}

/// Result of [remove_floor]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    /// The points that were kept, in input order
    pub retained: Vec<Point>,
    /// Input indices of the removed points, ascending
    pub removed_indices: Vec<usize>,
    /// Number of input points that fell into the floor band
    pub floor_candidates: usize,
}

impl FilterResult {
    /// Per-point mask over the `num_points` input points that is `true` for every removed point
    pub fn removal_mask(&self, num_points: usize) -> Vec<bool> {
        let mut mask = vec![false; num_points];
        for index in self.removed_indices.iter().copied() {
            mask[index] = true;
        }
        mask
    }
}

/// Returns all points inside the floor band, i.e. whose height is at most `floor_ratio` of the height range
/// above the lowest point
pub fn floor_band_points(points: &[Point], floor_ratio: f64, up_axis: Axis) -> Vec<Point> {
    let (min, max) = match axis_range(points, up_axis) {
        Some(minmax) => minmax,
        None => return vec![],
    };
    let floor_max = min + (max - min) * floor_ratio;
    let floor_points: Vec<Point> = points
        .iter()
        .filter(|point| up_axis.coordinate(point) <= floor_max)
        .copied()
        .collect();
    info!(
        "Floor band {} ~ {} contains {} / {} points",
        min,
        floor_max,
        floor_points.len(),
        points.len()
    );
    floor_points
}

/// Removes floor points while keeping the bases of vertical structures, using a [KdTree] for the reference
/// band. See [remove_floor_with]
pub fn remove_floor(points: &[Point], params: &FloorFilterParams) -> FilterResult {
    remove_floor_with::<KdTree>(points, params)
}

/// Removes floor points while keeping the bases of vertical structures such as columns.
///
/// Every point above the floor band is kept. A point inside the floor band is kept only if at least
/// `params.min_points_above` points of the reference band lie within `params.search_radius` of it in the
/// horizontal plane, i.e. inside the vertical cylinder through the point, cut to the reference band. The
/// reference band points are indexed with an index of type `I`.
///
/// If all points have the same height, the floor band and the reference band both collapse onto that
/// height, so every point is a floor candidate and is judged by its horizontal neighbourhood.
///
/// # Examples
///
/// ```
/// # use plinth_core::math::{Axis, Point};
/// # use plinth_algorithms::floor::{remove_floor, FloorFilterParams};
/// let mut points = vec![Point::new(0.0, 0.0, 0.0), Point::new(5.0, 0.0, 0.0)];
/// // a column above the first floor point
/// points.extend((1..=10).map(|i| Point::new(0.0, i as f64 * 0.1, 0.0)));
/// let params = FloorFilterParams {
///     floor_ratio: 0.05,
///     search_radius: 0.5,
///     mid_start: 0.1,
///     mid_end: 0.4,
///     min_points_above: 2,
///     up_axis: Axis::Y,
/// };
/// let result = remove_floor(&points, &params);
/// assert_eq!(result.removed_indices, vec![1]);
/// ```
pub fn remove_floor_with<I: SpatialIndex>(points: &[Point], params: &FloorFilterParams) -> FilterResult {
    let mut result = FilterResult::default();
    let bands = match HeightBands::from_points(points, params) {
        Some(bands) => bands,
        None => return result,
    };
    let up_axis = params.up_axis;

    info!(
        "Height ({}) range {} ~ {} (range {}), floor band <= {}, reference band {} ~ {}",
        up_axis,
        bands.min,
        bands.max,
        bands.range(),
        bands.floor_max,
        bands.mid_start,
        bands.mid_end
    );

    // Flattened onto the horizontal plane, a spherical query becomes a cylinder query restricted to the band
    let reference: Vec<Point> = points
        .iter()
        .filter(|point| bands.is_reference(up_axis.coordinate(point)))
        .map(|point| up_axis.project_out(point))
        .collect();
    info!("{} points in the reference band", reference.len());
    let reference_index = I::build(&reference);

    for (index, point) in points.iter().enumerate() {
        if !bands.is_floor(up_axis.coordinate(point)) {
            result.retained.push(*point);
            continue;
        }

        result.floor_candidates += 1;
        let keep = params.min_points_above == 0
            || reference_index
                .radius_query(&up_axis.project_out(point), params.search_radius)
                .len()
                >= params.min_points_above;
        if keep {
            result.retained.push(*point);
        } else {
            result.removed_indices.push(index);
        }

        if index % 100_000 == 0 {
            debug!("Floor removal progress: {} / {}", index, points.len());
        }
    }

    info!(
        "Floor removal: {} floor candidates, {} removed, {} retained",
        result.floor_candidates,
        result.removed_indices.len(),
        result.retained.len()
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::index::{RStarIndex, StrTree};

    fn params(min_points_above: usize) -> FloorFilterParams {
        FloorFilterParams {
            floor_ratio: 0.1,
            search_radius: 0.2,
            mid_start: 0.2,
            mid_end: 0.6,
            min_points_above,
            up_axis: Axis::Y,
        }
    }

    /// Floor points on a line along x at height 0, a column at x = 0 from height 0 to 1
    fn floor_and_column() -> Vec<Point> {
        let mut points: Vec<_> = (-10..=10)
            .map(|i| Point::new(i as f64 * 0.1, 0.0, 0.0))
            .collect();
        points.extend((1..=20).map(|i| Point::new(0.0, i as f64 * 0.05, 0.0)));
        points
    }

    #[test]
    fn test_points_above_floor_are_always_kept() {
        let points = floor_and_column();
        let result = remove_floor(&points, &params(usize::MAX));
        // the floor line and the two lowest column points go, the rest of the column stays
        assert_eq!(result.removed_indices, (0..23).collect::<Vec<_>>());
        assert_eq!(result.retained.len(), 18);
        assert!(result.retained.iter().all(|point| point.y > 0.1));
    }

    #[test]
    fn test_floor_under_column_is_kept() {
        let points = floor_and_column();
        let result = remove_floor(&points, &params(3));
        // floor points within 0.2 of the column (x in [-0.2, 0.2]) survive
        let expected_removed: Vec<_> = (0..21).filter(|i| !(8..=12).contains(i)).collect();
        assert_eq!(result.removed_indices, expected_removed);
        assert_eq!(result.floor_candidates, 23);
        assert_eq!(result.retained.len() + result.removed_indices.len(), points.len());
    }

    #[test]
    fn test_backends_agree() {
        let points = floor_and_column();
        let expected = remove_floor(&points, &params(3));
        assert_eq!(remove_floor_with::<RStarIndex>(&points, &params(3)), expected);
        assert_eq!(remove_floor_with::<StrTree>(&points, &params(3)), expected);
    }

    #[test]
    fn test_cylinder_reaches_beyond_search_radius_vertically() {
        // the reference band is far above the floor point, but directly above it
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 5.0, 0.0),
            Point::new(0.05, 5.0, 0.0),
            Point::new(0.0, 10.0, 0.0),
        ];
        let params = FloorFilterParams {
            floor_ratio: 0.1,
            search_radius: 0.1,
            mid_start: 0.4,
            mid_end: 0.6,
            min_points_above: 2,
            up_axis: Axis::Y,
        };
        let result = remove_floor(&points, &params);
        assert!(result.removed_indices.is_empty());
    }

    #[test]
    fn test_z_up() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(3.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 0.5),
            Point::new(0.0, 0.0, 1.0),
        ];
        let params = FloorFilterParams {
            floor_ratio: 0.1,
            search_radius: 0.1,
            mid_start: 0.4,
            mid_end: 0.6,
            min_points_above: 1,
            up_axis: Axis::Z,
        };
        let result = remove_floor(&points, &params);
        assert_eq!(result.removed_indices, vec![1]);
    }

    #[test]
    fn test_empty_input() {
        let result = remove_floor(&[], &FloorFilterParams::default());
        assert_eq!(result, FilterResult::default());
        assert!(floor_band_points(&[], 0.5, Axis::Y).is_empty());
    }

    #[test]
    fn test_flat_input_does_not_divide_by_zero() {
        let points: Vec<_> = (0..5).map(|i| Point::new(i as f64, 2.0, 0.0)).collect();
        let bands = HeightBands::from_points(&points, &params(1)).unwrap();
        assert_eq!(bands.range(), 0.0);
        assert_eq!(bands.floor_max, 2.0);

        // every point is a floor candidate and sees itself in the (collapsed) reference band
        let result = remove_floor(&points, &params(1));
        assert_eq!(result.floor_candidates, 5);
        assert!(result.removed_indices.is_empty());

        let result = remove_floor(&points, &params(2));
        assert_eq!(result.removed_indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_floor_band_points() {
        let points = floor_and_column();
        let floor = floor_band_points(&points, 0.1, Axis::Y);
        assert_eq!(floor.len(), 23);
        assert!(floor.iter().all(|point| point.y <= 0.1));
    }

    #[test]
    fn test_removal_mask() {
        let result = FilterResult {
            retained: vec![],
            removed_indices: vec![0, 3],
            floor_candidates: 2,
        };
        assert_eq!(result.removal_mask(4), vec![true, false, false, true]);
    }
}
