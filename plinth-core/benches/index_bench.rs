use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plinth_core::index::{AnyIndex, IndexBackend, SpatialIndex};
use plinth_core::math::Point;
use rand::{thread_rng, Rng};

const NUM_POINTS: usize = 50_000;
const QUERY_RADIUS: f64 = 0.02;

fn gen_random_points(count: usize) -> Vec<Point> {
    let mut rng = thread_rng();
    (0..count)
        .map(|_| Point::new(rng.gen(), rng.gen(), rng.gen()))
        .collect()
}

fn query_all(index: &AnyIndex, targets: &[Point]) {
    let mut total = 0;
    for target in targets {
        total += index.radius_query(target, QUERY_RADIUS).len();
    }
    black_box(total);
}

fn bench(c: &mut Criterion) {
    let points = gen_random_points(NUM_POINTS);
    let targets = &points[..1000];

    for backend in IndexBackend::ALL.iter().copied() {
        c.bench_function(&format!("build_{}", backend), |b| {
            b.iter(|| black_box(AnyIndex::build_with(backend, &points)));
        });

        let index = AnyIndex::build_with(backend, &points);
        c.bench_function(&format!("radius_query_{}", backend), |b| {
            b.iter(|| query_all(&index, targets));
        });
    }
}

criterion_group! {
    name = index;
    config = Criterion::default().sample_size(20);
    targets = bench
}
criterion_main!(index);
