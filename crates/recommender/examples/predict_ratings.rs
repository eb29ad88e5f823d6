//! Example: predict ratings for a user
//!
//! Run with: cargo run --package recommender --example predict_ratings
//!
//! This example shows how to:
//! 1. Load the MovieLens 100K dataset
//! 2. Find the users most similar to a target user
//! 3. Predict scores for a few movies the user hasn't rated
//! 4. Rank recommendations

use anyhow::Context;
use data_loader::DataIndex;
use recommender::Recommender;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Rating Prediction Example ===\n");

    let start = Instant::now();
    let data_index = Arc::new(DataIndex::load_from_files(Path::new("data/ml-100k"))?);
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let recommender = Recommender::from_index(data_index.clone());
    let user_id = 1;

    println!("Most similar users to user {}:", user_id);
    for (other, sim) in recommender.similar_users(user_id, 5)? {
        println!("  user {:>4}  similarity {:.3}", other, sim);
    }
    println!();

    println!("Predictions for unrated movies:");
    let unrated = data_index
        .movie_ids()
        .into_iter()
        .filter(|&movie_id| !data_index.has_rated(user_id, movie_id))
        .take(5);
    for movie_id in unrated {
        let movie = data_index
            .get_movie(movie_id)
            .with_context(|| format!("movie {} missing", movie_id))?;
        match recommender.predict_rating(user_id, movie_id)? {
            Some(score) => println!("  {:<40} {:.2}", movie.title, score),
            None => println!("  {:<40} cannot predict", movie.title),
        }
    }
    println!();

    let start = Instant::now();
    let recommendations = recommender.recommend(user_id, 10)?;
    println!("Top 10 recommendations ({:?}):", start.elapsed());
    for (i, rec) in recommendations.iter().enumerate() {
        if let Some(movie) = data_index.get_movie(rec.movie_id) {
            println!(
                "  {:>2}. {} ({:.2}, {} neighbors)",
                i + 1,
                movie.title,
                rec.predicted_score,
                rec.neighbor_count
            );
        }
    }

    Ok(())
}
