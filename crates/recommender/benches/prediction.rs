//! Benchmarks for similarity and prediction
//!
//! Run with: cargo bench --package recommender
//!
//! Uses the MovieLens 100K dataset when it is present under data/ml-100k,
//! otherwise a synthetic index of similar shape.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{DataIndex, Movie, Rating, User};
use recommender::Recommender;
use std::path::Path;
use std::sync::Arc;

fn synthetic_index() -> DataIndex {
    let mut index = DataIndex::new();
    for user_id in 1..=943u32 {
        index.insert_user(User::new(user_id));
    }
    for movie_id in 1..=1682u32 {
        index.insert_movie(Movie::new(movie_id, format!("Movie {}", movie_id)));
    }
    // ~100 ratings per user, deterministic spread over the catalogue
    for user_id in 1..=943u32 {
        for k in 0..100u32 {
            let movie_id = (user_id * 31 + k * 17) % 1682 + 1;
            let score = ((user_id + movie_id * 7) % 5 + 1) as i32;
            index.insert_rating(Rating::new(user_id, movie_id, score));
        }
    }
    index
}

fn load_test_data() -> Arc<DataIndex> {
    let data_dir = Path::new("../../data/ml-100k");
    let index = if data_dir.exists() {
        DataIndex::load_from_files(data_dir).expect("Failed to load test data")
    } else {
        synthetic_index()
    };
    Arc::new(index)
}

fn bench_similarity(c: &mut Criterion) {
    let recommender = Recommender::from_index(load_test_data());

    c.bench_function("similarity", |b| {
        b.iter(|| {
            let sim = recommender.similarity(black_box(1), black_box(2)).unwrap();
            black_box(sim)
        })
    });
}

fn bench_predict_rating(c: &mut Criterion) {
    let recommender = Recommender::from_index(load_test_data());

    c.bench_function("predict_rating", |b| {
        b.iter(|| {
            let prediction = recommender
                .predict_rating(black_box(1), black_box(50))
                .unwrap();
            black_box(prediction)
        })
    });
}

fn bench_recommend(c: &mut Criterion) {
    let recommender = Recommender::from_index(load_test_data());

    c.bench_function("recommend", |b| {
        b.iter(|| {
            let recommendations = recommender.recommend(black_box(1), black_box(20)).unwrap();
            black_box(recommendations)
        })
    });
}

criterion_group!(
    benches,
    bench_similarity,
    bench_predict_rating,
    bench_recommend
);
criterion_main!(benches);
