//! DataIndex loading and validation.
//!
//! Parses the three MovieLens 100K files in parallel with Rayon, fills the
//! index, then checks referential integrity and the score scale.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info, instrument};

impl DataIndex {
    /// Load the MovieLens 100K dataset from a directory, assuming the
    /// default 1-5 scale.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        Self::load_from_files_with_scale(data_dir, ScoreScale::default())
    }

    /// Load the dataset and validate every score against `scale`.
    ///
    /// Steps:
    /// 1. Parse u.user, u.item and u.data in parallel
    /// 2. Insert users, movies, ratings
    /// 3. Validate references and scores
    #[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
    pub fn load_from_files_with_scale(data_dir: &Path, scale: ScoreScale) -> Result<Self> {
        info!("Loading ratings dataset");

        let users_path = data_dir.join("u.user");
        let movies_path = data_dir.join("u.item");
        let ratings_path = data_dir.join("u.data");

        // Nested joins give three-way parallelism
        let ((users, movies), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_users(&users_path),
                    || parser::parse_movies(&movies_path),
                )
            },
            || parser::parse_ratings(&ratings_path),
        );

        let users = users?;
        let movies = movies?;
        let ratings = ratings?;

        info!(
            users = users.len(),
            movies = movies.len(),
            ratings = ratings.len(),
            "Parsed dataset files"
        );

        let mut index = DataIndex::new();

        for user in users {
            index.insert_user(user);
        }

        for movie in movies {
            index.insert_movie(movie);
        }

        let mut replaced = 0usize;
        for rating in ratings {
            if index.insert_rating(rating).is_some() {
                replaced += 1;
            }
        }
        if replaced > 0 {
            debug!(replaced, "Duplicate ratings collapsed to the latest score");
        }

        index.validate(&scale)?;

        info!("DataIndex built and validated");
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Every rating must reference an existing user and movie, and its
    /// score must lie on `scale`.
    pub fn validate(&self, scale: &ScoreScale) -> Result<()> {
        for ratings in self.user_ratings.values() {
            for rating in ratings {
                if !self.users.contains_key(&rating.user_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "User".to_string(),
                        id: rating.user_id,
                    });
                }
                if !self.movies.contains_key(&rating.movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: rating.movie_id,
                    });
                }
                if !scale.contains(rating.score) {
                    return Err(DataLoadError::ScoreOutOfRange {
                        user_id: rating.user_id,
                        movie_id: rating.movie_id,
                        score: rating.score,
                        min: scale.min,
                        max: scale.max,
                    });
                }
            }
        }
        Ok(())
    }
}
