//! Core domain types for the ratings dataset.
//!
//! The recommender only reads these. Creation and mutation happen here,
//! in the storage layer, through `DataIndex`.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// A score on the dataset's ordinal scale.
///
/// Kept as a plain integer: the scale itself lives in [`ScoreScale`] and is
/// only consulted when validating loaded data.
pub type Score = i32;

// =============================================================================
// Entities
// =============================================================================

/// A user of the ratings site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub age: Option<u8>,
    pub zipcode: Option<String>,
}

impl User {
    /// A user with no profile attributes.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            age: None,
            zipcode: None,
        }
    }
}

/// A movie that can be rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    /// Title without the trailing " (YYYY)" suffix
    pub title: String,
    /// Year taken from the title suffix, if there was one
    pub year: Option<u16>,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<String>,
}

impl Movie {
    /// A movie with only a title.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year: None,
            released_at: None,
            imdb_url: None,
        }
    }
}

/// A single user's score for a single movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: Score,
    /// Unix timestamp when the rating was made
    pub timestamp: i64,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, score: Score) -> Self {
        Self {
            user_id,
            movie_id,
            score,
            timestamp: 0,
        }
    }
}

/// Inclusive bounds of the rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreScale {
    pub min: Score,
    pub max: Score,
}

impl ScoreScale {
    pub fn new(min: Score, max: Score) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, score: Score) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

impl Default for ScoreScale {
    /// The 1-5 star scale used by MovieLens
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

/// Aggregate view of a movie's ratings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovieStats {
    pub avg_score: f64,
    pub rating_count: u32,
}

// =============================================================================
// DataIndex - The In-Memory Store
// =============================================================================

/// Holds every user, movie and rating, indexed both ways.
///
/// Ratings are stored twice (by user and by movie) so that both sides of
/// the recommender's queries are a single map lookup. `insert_rating` keeps
/// the two copies in step and enforces one rating per (user, movie) pair.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) movies: HashMap<MovieId, Movie>,

    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    /// All ratings received by each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a user by ID
    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if the user has no ratings (or doesn't exist)
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The rating a user gave a movie, if any
    pub fn get_rating(&self, user_id: UserId, movie_id: MovieId) -> Option<&Rating> {
        self.get_user_ratings(user_id)
            .iter()
            .find(|r| r.movie_id == movie_id)
    }

    pub fn has_rated(&self, user_id: UserId, movie_id: MovieId) -> bool {
        self.get_rating(user_id, movie_id).is_some()
    }

    /// All user IDs in ascending order
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All movie IDs in ascending order
    pub fn movie_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self.movies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Movies ordered by title, then by ID for identical titles
    pub fn movies_by_title(&self) -> Vec<&Movie> {
        let mut movies: Vec<&Movie> = self.movies.values().collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        movies
    }

    /// Average score and count for a movie.
    ///
    /// `None` when the movie has no ratings.
    pub fn movie_stats(&self, movie_id: MovieId) -> Option<MovieStats> {
        let ratings = self.get_movie_ratings(movie_id);
        if ratings.is_empty() {
            return None;
        }
        let total: i64 = ratings.iter().map(|r| r.score as i64).sum();
        Some(MovieStats {
            avg_score: total as f64 / ratings.len() as f64,
            rating_count: ratings.len() as u32,
        })
    }

    /// Insert a user into the index
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert a movie into the index
    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Insert or update a rating.
    ///
    /// If the user already rated this movie the old rating is replaced in
    /// both indices and its score is returned.
    pub fn insert_rating(&mut self, rating: Rating) -> Option<Score> {
        let by_user = self.user_ratings.entry(rating.user_id).or_default();
        let previous = match by_user.iter_mut().find(|r| r.movie_id == rating.movie_id) {
            Some(existing) => {
                let old = existing.score;
                *existing = rating;
                Some(old)
            }
            None => {
                by_user.push(rating);
                None
            }
        };

        let by_movie = self.movie_ratings.entry(rating.movie_id).or_default();
        match by_movie.iter_mut().find(|r| r.user_id == rating.user_id) {
            Some(existing) => *existing = rating,
            None => by_movie.push(rating),
        }

        previous
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.user_ratings.values().map(|v| v.len()).sum();
        (self.users.len(), self.movies.len(), total_ratings)
    }
}
