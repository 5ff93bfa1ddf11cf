//! Benchmarks for ranking
//!
//! Run with: cargo bench --package ranker
//!
//! Uses a synthetic 2000x2000 matrix; the shipped catalog is about twice that.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, DataIndex, Movie, SimilarityMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ranker::{remap_scores, Ranker};
use std::sync::Arc;

const MOVIES: usize = 2000;

fn build_index() -> Arc<DataIndex> {
    let mut rng = StdRng::seed_from_u64(1);
    let rows: Vec<Vec<f32>> = (0..MOVIES)
        .map(|_| (0..MOVIES).map(|_| rng.random::<f32>()).collect())
        .collect();
    let movies = (0..MOVIES)
        .map(|i| Movie {
            id: i as u32,
            title: format!("Movie {}", i),
        })
        .collect();

    let index = DataIndex::new(
        Catalog::new(movies).expect("catalog"),
        SimilarityMatrix::from_rows(rows).expect("matrix"),
    )
    .expect("index");
    Arc::new(index)
}

fn bench_recommend(c: &mut Criterion) {
    let ranker = Ranker::new(build_index());

    c.bench_function("recommend_k12", |b| {
        b.iter(|| {
            let recs = ranker.recommend(black_box(1000), black_box(12)).unwrap();
            black_box(recs)
        })
    });
}

fn bench_remap(c: &mut Criterion) {
    let values: Vec<f32> = (0..30).map(|i| 1.0 - i as f32 / 40.0).collect();

    c.bench_function("remap_scores_30", |b| {
        b.iter(|| black_box(remap_scores(black_box(&values))))
    });
}

criterion_group!(benches, bench_recommend, bench_remap);
criterion_main!(benches);
