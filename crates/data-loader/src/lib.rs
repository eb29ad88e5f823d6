//! # Data Loader Crate
//!
//! This crate is the storage side of the ratings app: it loads the
//! MovieLens 100K dataset and keeps users, movies and ratings in memory.
//!
//! ## Main Components
//!
//! - **types**: Domain types (User, Movie, Rating, ScoreScale, DataIndex)
//! - **parser**: Parse u.user / u.item / u.data into Rust structs
//! - **index**: Parallel loading and integrity validation
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-100k"))?;
//!
//! let user = index.get_user(1).unwrap();
//! let ratings = index.get_user_ratings(1);
//!
//! println!("User {} rated {} movies", user.id, ratings.len());
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

pub use error::{DataLoadError, Result};
pub use types::{DataIndex, Movie, MovieId, MovieStats, Rating, Score, ScoreScale, User, UserId};
