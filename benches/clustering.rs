use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dbclust::cluster::{Clustering, DbPack, Dbscan, FuzzyClustering, FuzzyDbscan};
use dbclust::spatial::KdTree;
use rand::prelude::*;

/// `n` points in noisy blobs around `centers` random anchors in `[0, 10)²`.
fn blobs(n: usize, centers: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let anchors: Vec<[f32; 2]> = (0..centers)
        .map(|_| [rng.random::<f32>() * 10.0, rng.random::<f32>() * 10.0])
        .collect();
    (0..n)
        .map(|i| {
            let [x, y] = anchors[i % centers];
            let dx: f32 = (0..3).map(|_| rng.random::<f32>() - 0.5).sum();
            let dy: f32 = (0..3).map(|_| rng.random::<f32>() - 0.5).sum();
            vec![x + dx * 0.4, y + dy * 0.4]
        })
        .collect()
}

fn bench_dbscan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dbscan");

    for n in [500, 2000] {
        let data = blobs(n, 8, 42);
        group.bench_with_input(BenchmarkId::new("matrix", n), &data, |b, data| {
            let model = Dbscan::new(0.3, 5).unwrap();
            b.iter(|| model.predict(black_box(data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("kdtree", n), &data, |b, data| {
            let model = Dbscan::new(0.3, 5).unwrap().with_kdtree();
            b.iter(|| model.predict(black_box(data)).unwrap())
        });
    }

    group.finish();
}

fn bench_fuzzy(c: &mut Criterion) {
    let data = blobs(1000, 8, 7);
    let model = FuzzyDbscan::combined(0.2, 0.5, 3, 10).unwrap().with_kdtree();
    c.bench_function("fuzzy_combined_n1000", |b| {
        b.iter(|| model.predict(black_box(&data)).unwrap())
    });
}

fn bench_kdtree(c: &mut Criterion) {
    let data = blobs(10_000, 16, 3);
    c.bench_function("kdtree_build_n10000", |b| {
        b.iter(|| KdTree::new(black_box(&data)).unwrap())
    });

    let tree = KdTree::new(&data).unwrap();
    c.bench_function("kdtree_nearest_n10000", |b| {
        b.iter(|| tree.nearest(black_box(&[5.0, 5.0])).unwrap())
    });
}

fn bench_pack(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let mut values: Vec<f32> = (0..100_000).map(|_| rng.random::<f32>() * 1000.0).collect();
    values.sort_unstable_by(f32::total_cmp);

    let pack = DbPack::new(0.05, 4).unwrap();
    c.bench_function("dbpack_n100000", |b| {
        b.iter(|| pack.predict(black_box(&values)).unwrap())
    });
}

criterion_group!(benches, bench_dbscan, bench_fuzzy, bench_kdtree, bench_pack);
criterion_main!(benches);
