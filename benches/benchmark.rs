use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;
use image_tracking::detected_features::Descriptor;
use image_tracking::geometry::find_homography_dlt;
use image_tracking::matching::good_matches;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn random_descriptors(n: usize, seed: u64) -> Vec<Descriptor> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| Descriptor([rng.random(), rng.random(), rng.random(), rng.random()]))
        .collect()
}

fn bench_matching(c: &mut Criterion) {
    let query = random_descriptors(500, 1);
    let train = random_descriptors(500, 2);
    c.bench_function("good_matches_500x500", |b| {
        b.iter(|| good_matches(black_box(&query), black_box(&train)))
    });
}

fn bench_homography(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let src: Vec<Vec2> = (0..50)
        .map(|_| Vec2::new(rng.random_range(0.0..640.0), rng.random_range(0.0..480.0)))
        .collect();
    let dst: Vec<Vec2> = src
        .iter()
        .map(|p| Vec2::new(1.1 * p.x + 0.2 * p.y + 5.0, -0.1 * p.x + 0.95 * p.y + 12.0))
        .collect();
    c.bench_function("homography_dlt_50", |b| {
        b.iter(|| find_homography_dlt(black_box(&src), black_box(&dst)))
    });
}

criterion_group!(benches, bench_matching, bench_homography);
criterion_main!(benches);
