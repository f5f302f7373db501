use plinth_core::math::{distance_squared, Point};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn uniform_points(rng: &mut StdRng, count: usize, min: f64, max: f64) -> Vec<Point> {
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(min..max),
                rng.gen_range(min..max),
                rng.gen_range(min..max),
            )
        })
        .collect()
}

/// `num_blobs` cubes of side `blob_size` with `points_per_blob` points each, followed by `noise` points
/// scattered over the whole `[0, extent)^3` volume
pub fn blobs_with_noise(
    seed: u64,
    num_blobs: usize,
    points_per_blob: usize,
    blob_size: f64,
    noise: usize,
    extent: f64,
) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = vec![];
    for _ in 0..num_blobs {
        let corner = uniform_points(&mut rng, 1, 0.0, extent - blob_size)[0];
        points.extend(
            uniform_points(&mut rng, points_per_blob, 0.0, blob_size)
                .into_iter()
                .map(|offset| corner + offset.coords),
        );
    }
    points.extend(uniform_points(&mut rng, noise, 0.0, extent));
    points
}

pub fn brute_force_neighbours(points: &[Point], id: usize, radius: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, other)| distance_squared(&points[id], other) <= radius * radius)
        .map(|(other_id, _)| other_id)
        .collect()
}
