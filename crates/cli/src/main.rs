use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MovieId, UserId};
use rayon::prelude::*;
use recommender::{Prediction, Recommender, RecommenderConfig, ScoredMovie};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Movie Ratings - collaborative filtering over MovieLens 100K
#[derive(Parser)]
#[command(name = "movie-ratings")]
#[command(about = "Predict movie ratings from similar users", long_about = None)]
struct Cli {
    /// Path to MovieLens 100K dataset directory
    #[arg(short, long, default_value = "data/ml-100k")]
    data_dir: PathBuf,

    /// JSON file with recommender settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only use neighbors with similarity above this
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Only use the k most similar neighbors
    #[arg(long)]
    max_neighbors: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all users
    Users,

    /// Show a user's profile and rated movies
    User {
        #[arg(long)]
        user_id: UserId,
    },

    /// List all movies by title
    Movies,

    /// Show a movie's details and ratings
    Movie {
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Pearson similarity between two users
    Similarity {
        #[arg(long)]
        user_a: UserId,

        #[arg(long)]
        user_b: UserId,
    },

    /// Predict the score a user would give a movie
    Predict {
        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        movie_id: MovieId,

        /// List the neighbors behind the prediction
        #[arg(long)]
        explain: bool,
    },

    /// Users whose taste correlates most with a user
    SimilarUsers {
        #[arg(long)]
        user_id: UserId,

        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Best predicted movies the user hasn't rated
    Recommend {
        #[arg(long)]
        user_id: UserId,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Time random predictions
    Benchmark {
        /// Number of predictions to make
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    info!(?config, "Recommender configuration");

    let json = cli.json;
    if !json {
        println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    }
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load MovieLens dataset")?,
    );
    if !json {
        println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());
    }

    let recommender = Recommender::from_index(data_index.clone()).with_config(config);

    match cli.command {
        Commands::Users => handle_users(&data_index, json)?,
        Commands::User { user_id } => handle_user(&data_index, user_id, json)?,
        Commands::Movies => handle_movies(&data_index, json)?,
        Commands::Movie { movie_id } => handle_movie(&data_index, movie_id, json)?,
        Commands::Similarity { user_a, user_b } => {
            handle_similarity(&recommender, user_a, user_b, json)?
        }
        Commands::Predict {
            user_id,
            movie_id,
            explain,
        } => handle_predict(&data_index, &recommender, user_id, movie_id, explain, json)?,
        Commands::SimilarUsers { user_id, limit } => {
            handle_similar_users(&recommender, user_id, limit, json)?
        }
        Commands::Recommend { user_id, limit } => {
            handle_recommend(&data_index, &recommender, user_id, limit, json)?
        }
        Commands::Benchmark { requests } => handle_benchmark(&data_index, &recommender, requests)?,
    }

    Ok(())
}

/// Config file first, then command-line overrides
fn build_config(cli: &Cli) -> Result<RecommenderConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RecommenderConfig::default(),
    };
    if let Some(min_similarity) = cli.min_similarity {
        config = config.with_min_similarity(min_similarity);
    }
    if let Some(max_neighbors) = cli.max_neighbors {
        config = config.with_max_neighbors(max_neighbors);
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<RecommenderConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn movie_label(data_index: &DataIndex, movie_id: MovieId) -> String {
    match data_index.get_movie(movie_id) {
        Some(movie) => match movie.year {
            Some(year) => format!("{} ({})", movie.title, year),
            None => movie.title.clone(),
        },
        None => format!("movie {}", movie_id),
    }
}

fn handle_users(data_index: &DataIndex, json: bool) -> Result<()> {
    if json {
        let users: Vec<_> = data_index
            .user_ids()
            .into_iter()
            .filter_map(|user_id| data_index.get_user(user_id))
            .collect();
        return print_json(&json!(users));
    }

    println!("{}", "Users:".bold().blue());
    for user_id in data_index.user_ids() {
        let count = data_index.get_user_ratings(user_id).len();
        println!("  {:>4}  {} ratings", user_id.to_string().green(), count);
    }
    Ok(())
}

fn handle_user(data_index: &DataIndex, user_id: UserId, json: bool) -> Result<()> {
    let user = data_index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;
    let ratings = data_index.get_user_ratings(user_id);

    if json {
        let mut ratings = ratings.to_vec();
        ratings.sort_by_key(|r| r.movie_id);
        return print_json(&json!({ "user": user, "ratings": ratings }));
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    match user.age {
        Some(age) => println!("{}Age: {}", "• ".green(), age),
        None => println!("{}Age: unknown", "• ".green()),
    }
    println!(
        "{}Zipcode: {}",
        "• ".green(),
        user.zipcode.as_deref().unwrap_or("unknown")
    );
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    if !ratings.is_empty() {
        let total: f64 = ratings.iter().map(|r| r.score as f64).sum();
        println!(
            "{}Average rating: {:.2}",
            "• ".cyan(),
            total / ratings.len() as f64
        );
    }

    let mut rated: Vec<_> = ratings
        .iter()
        .map(|r| (movie_label(data_index, r.movie_id), r.score))
        .collect();
    rated.sort();
    println!("Rated movies:");
    for (label, score) in rated {
        println!("  - {} (Rating: {})", label, score);
    }
    Ok(())
}

fn handle_movies(data_index: &DataIndex, json: bool) -> Result<()> {
    if json {
        return print_json(&json!(data_index.movies_by_title()));
    }

    println!("{}", "Movies:".bold().blue());
    for movie in data_index.movies_by_title() {
        println!(
            "  {:>4}  {}",
            movie.id.to_string().green(),
            movie_label(data_index, movie.id)
        );
    }
    Ok(())
}

fn handle_movie(data_index: &DataIndex, movie_id: MovieId, json: bool) -> Result<()> {
    let movie = data_index
        .get_movie(movie_id)
        .ok_or_else(|| anyhow!("Movie {} not found", movie_id))?;
    let mut ratings: Vec<_> = data_index.get_movie_ratings(movie_id).iter().collect();
    ratings.sort_by_key(|r| r.user_id);

    if json {
        return print_json(&json!({
            "movie": movie,
            "stats": data_index.movie_stats(movie_id),
            "ratings": ratings,
        }));
    }

    println!("{}", movie_label(data_index, movie_id).bold().blue());
    if let Some(released_at) = movie.released_at {
        println!("{}Released: {}", "• ".green(), released_at);
    }
    if let Some(url) = &movie.imdb_url {
        println!("{}IMDb: {}", "• ".green(), url);
    }
    match data_index.movie_stats(movie_id) {
        Some(stats) => println!(
            "{}Average rating: {:.2} ({} ratings)",
            "• ".cyan(),
            stats.avg_score,
            stats.rating_count
        ),
        None => println!("{}No ratings yet", "• ".cyan()),
    }

    println!("Ratings:");
    for rating in ratings {
        println!("  - user {}: {}", rating.user_id, rating.score);
    }
    Ok(())
}

fn handle_similarity(
    recommender: &Recommender,
    user_a: UserId,
    user_b: UserId,
    json: bool,
) -> Result<()> {
    let similarity = recommender.similarity(user_a, user_b)?;
    if json {
        return print_json(&json!({
            "user_a": user_a,
            "user_b": user_b,
            "similarity": similarity,
        }));
    }

    match similarity {
        Some(sim) => println!(
            "Similarity between users {} and {}: {}",
            user_a,
            user_b,
            format!("{:.4}", sim).green()
        ),
        None => println!(
            "Similarity between users {} and {}: {}",
            user_a,
            user_b,
            "undefined".yellow()
        ),
    }
    Ok(())
}

fn handle_predict(
    data_index: &DataIndex,
    recommender: &Recommender,
    user_id: UserId,
    movie_id: MovieId,
    explain: bool,
    json: bool,
) -> Result<()> {
    let label = movie_label(data_index, movie_id);

    if json {
        let existing = data_index.get_rating(user_id, movie_id).map(|r| r.score);
        let prediction = match existing {
            Some(_) => None,
            None => recommender.predict_with_neighbors(user_id, movie_id)?,
        };
        return print_json(&json!({
            "user_id": user_id,
            "movie_id": movie_id,
            "existing_score": existing,
            "prediction": prediction,
        }));
    }

    if let Some(rating) = data_index.get_rating(user_id, movie_id) {
        println!(
            "User {} already rated {}: {}",
            user_id,
            label,
            rating.score.to_string().green()
        );
        return Ok(());
    }

    match recommender.predict_with_neighbors(user_id, movie_id)? {
        Some(prediction) => {
            println!(
                "Predicted rating for user {} on {}: {}",
                user_id,
                label,
                format!("{:.2}", prediction.score).green()
            );
            if explain {
                print_neighbors(&prediction);
            }
        }
        None => println!(
            "User {} on {}: {}",
            user_id,
            label,
            "cannot predict".yellow()
        ),
    }
    Ok(())
}

fn print_neighbors(prediction: &Prediction) {
    println!("{}", "Neighbors:".bold());
    for neighbor in &prediction.neighbors {
        println!(
            "  user {:>4}  similarity {:.3}  rated {}",
            neighbor.user_id, neighbor.similarity, neighbor.score
        );
    }
}

fn handle_similar_users(
    recommender: &Recommender,
    user_id: UserId,
    limit: usize,
    json: bool,
) -> Result<()> {
    let similar = recommender.similar_users(user_id, limit)?;
    if json {
        let similar: Vec<Value> = similar
            .iter()
            .map(|&(other, sim)| json!({ "user_id": other, "similarity": sim }))
            .collect();
        return print_json(&json!(similar));
    }

    println!("{}", format!("Users similar to {}:", user_id).bold().blue());
    if similar.is_empty() {
        println!("  {}", "none".yellow());
    }
    for (rank, (other, sim)) in similar.iter().enumerate() {
        println!(
            "{}. user {} - similarity {:.4}",
            (rank + 1).to_string().green(),
            other,
            sim
        );
    }
    Ok(())
}

fn handle_recommend(
    data_index: &DataIndex,
    recommender: &Recommender,
    user_id: UserId,
    limit: usize,
    json: bool,
) -> Result<()> {
    let recommendations = recommender.recommend(user_id, limit)?;
    if json {
        return print_json(&json!(recommendations));
    }
    print_recommendations(data_index, &recommendations);
    Ok(())
}

fn print_recommendations(data_index: &DataIndex, recommendations: &[ScoredMovie]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  {}", "cannot predict any unrated movie".yellow());
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.2} ({} neighbors)",
            (rank + 1).to_string().green(),
            movie_label(data_index, rec.movie_id),
            rec.predicted_score,
            rec.neighbor_count
        );
    }
}

fn handle_benchmark(
    data_index: &DataIndex,
    recommender: &Recommender,
    requests: usize,
) -> Result<()> {
    let user_ids = data_index.user_ids();
    let movie_ids = data_index.movie_ids();
    if user_ids.is_empty() || movie_ids.is_empty() || requests == 0 {
        return Err(anyhow!("Nothing to benchmark"));
    }

    let pairs: Vec<(UserId, MovieId)> = (0..requests)
        .map(|_| {
            let user_id = user_ids[rand::random::<u32>() as usize % user_ids.len()];
            let movie_id = movie_ids[rand::random::<u32>() as usize % movie_ids.len()];
            (user_id, movie_id)
        })
        .collect();

    let start = Instant::now();
    let results: Vec<(Duration, bool)> = pairs
        .par_iter()
        .map(|&(user_id, movie_id)| {
            let start = Instant::now();
            let predicted = recommender.predict_rating(user_id, movie_id)?;
            Ok::<_, anyhow::Error>((start.elapsed(), predicted.is_some()))
        })
        .collect::<Result<_>>()?;
    let wall_time = start.elapsed();

    let defined = results.iter().filter(|(_, defined)| *defined).count();
    let mut timings: Vec<Duration> = results.into_iter().map(|(elapsed, _)| elapsed).collect();
    timings.sort();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];

    println!("Benchmark results:");
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} predictions/second",
        requests as f64 / wall_time.as_secs_f64()
    );
    println!("Defined predictions: {}/{}", defined, requests);

    Ok(())
}
