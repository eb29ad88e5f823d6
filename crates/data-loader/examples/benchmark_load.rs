use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() -> data_loader::Result<()> {
    let data_dir = Path::new("data/ml-100k");

    println!("Loading MovieLens 100K dataset...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_files(data_dir)?;
    let elapsed = start.elapsed();

    let (users, movies, ratings) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Movies: {}", movies);
    println!("Ratings: {}", ratings);
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
