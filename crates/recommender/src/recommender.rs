//! Rating prediction from similar users.
//!
//! ## Algorithm
//! 1. Every other user who rated the movie is a candidate neighbor
//! 2. Each candidate's Pearson similarity to the target is computed
//! 3. Undefined and non-positive similarities are dropped (as is anything
//!    at or below the configured floor)
//! 4. Optionally only the k most similar survivors are kept
//! 5. The prediction is the similarity-weighted average of their scores
//!
//! Neighbor evaluation runs on Rayon; the final sums are always taken in
//! ascending user-id order so results don't depend on thread scheduling.

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::lookup::{MovieLookup, UserLookup};
use crate::similarity::similarity;
use data_loader::{DataIndex, MovieId, Rating, Score, UserId};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A user who contributed to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f64,
    /// The neighbor's own score for the movie being predicted
    pub score: Score,
}

/// A predicted score together with the neighbors behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub score: f64,
    /// Contributing neighbors, ascending by user id
    pub neighbors: Vec<Neighbor>,
}

/// An unrated movie ranked for a user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub predicted_score: f64,
    pub neighbor_count: usize,
}

/// Similarity-weighted average of the neighbors' scores.
///
/// `None` for an empty slice or a non-positive total weight.
pub fn weighted_average(neighbors: &[Neighbor]) -> Option<f64> {
    let (weighted_sum, total_weight) = neighbors.iter().fold((0.0, 0.0), |(ws, tw), n| {
        (ws + n.similarity * n.score as f64, tw + n.similarity)
    });
    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

/// User-based collaborative filtering over injected lookups.
#[derive(Clone)]
pub struct Recommender {
    users: Arc<dyn UserLookup>,
    movies: Arc<dyn MovieLookup>,
    config: RecommenderConfig,
}

impl Recommender {
    /// Create a recommender with the default configuration
    pub fn new(users: Arc<dyn UserLookup>, movies: Arc<dyn MovieLookup>) -> Self {
        Self {
            users,
            movies,
            config: RecommenderConfig::default(),
        }
    }

    /// Use one `DataIndex` for both lookups
    pub fn from_index(data_index: Arc<DataIndex>) -> Self {
        Self::new(data_index.clone(), data_index)
    }

    pub fn with_config(mut self, config: RecommenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    fn user_ratings(&self, user_id: UserId) -> Result<&[Rating]> {
        self.users
            .user_ratings(user_id)
            .ok_or(RecommendError::UserNotFound(user_id))
    }

    /// Similarity between two users by id.
    ///
    /// `Ok(None)` when they share no rated movies or the correlation is
    /// undefined.
    #[instrument(skip(self))]
    pub fn similarity(&self, user_a: UserId, user_b: UserId) -> Result<Option<f64>> {
        let a = self.user_ratings(user_a)?;
        let b = self.user_ratings(user_b)?;
        Ok(similarity(a, b))
    }

    /// Predict the score `user_id` would give `movie_id`.
    ///
    /// Intended for movies the user hasn't rated; an existing rating is
    /// neither used nor returned. `Ok(None)` means no prediction can be
    /// made (no raters, or no rater positively correlated with the user).
    pub fn predict_rating(&self, user_id: UserId, movie_id: MovieId) -> Result<Option<f64>> {
        Ok(self
            .predict_with_neighbors(user_id, movie_id)?
            .map(|prediction| prediction.score))
    }

    /// Like [`predict_rating`](Self::predict_rating), also returning the
    /// neighbors used.
    #[instrument(skip(self))]
    pub fn predict_with_neighbors(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<Option<Prediction>> {
        let target = self.user_ratings(user_id)?;
        let raters = self
            .movies
            .movie_ratings(movie_id)
            .ok_or(RecommendError::MovieNotFound(movie_id))?;

        let neighbors = self.select_neighbors(user_id, raters, |other| {
            self.users
                .user_ratings(other)
                .and_then(|other_ratings| similarity(target, other_ratings))
        });
        debug!(
            candidates = raters.len(),
            neighbors = neighbors.len(),
            "Selected neighbors"
        );

        Ok(weighted_average(&neighbors).map(|score| Prediction { score, neighbors }))
    }

    /// Other users positively correlated with `user_id`, most similar first.
    #[instrument(skip(self))]
    pub fn similar_users(&self, user_id: UserId, limit: usize) -> Result<Vec<(UserId, f64)>> {
        let mut similar: Vec<(UserId, f64)> = self
            .similarity_map(user_id)?
            .into_iter()
            .collect();
        similar.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        similar.truncate(limit);
        Ok(similar)
    }

    /// Predict every movie the user hasn't rated and return the best.
    ///
    /// Movies without a defined prediction are left out. Ordered by
    /// predicted score, ties by movie id.
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: UserId, limit: usize) -> Result<Vec<ScoredMovie>> {
        let target = self.user_ratings(user_id)?;
        let rated: HashSet<MovieId> = target.iter().map(|r| r.movie_id).collect();

        // Similarities don't depend on the movie, so compute them once
        let similarities = self.similarity_map(user_id)?;
        debug!(neighbors = similarities.len(), "Computed similarity map");

        let unrated: Vec<MovieId> = self
            .movies
            .movie_ids()
            .into_iter()
            .filter(|movie_id| !rated.contains(movie_id))
            .collect();

        let mut scored: Vec<ScoredMovie> = unrated
            .par_iter()
            .filter_map(|&movie_id| {
                let raters = self.movies.movie_ratings(movie_id)?;
                let neighbors = self.select_neighbors(user_id, raters, |other| {
                    similarities.get(&other).copied()
                });
                weighted_average(&neighbors).map(|predicted_score| ScoredMovie {
                    movie_id,
                    predicted_score,
                    neighbor_count: neighbors.len(),
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.predicted_score
                .total_cmp(&a.predicted_score)
                .then(a.movie_id.cmp(&b.movie_id))
        });
        scored.truncate(limit);

        debug!(
            unrated = unrated.len(),
            recommended = scored.len(),
            "Ranked recommendations"
        );
        Ok(scored)
    }

    /// Similarity to every other user, keeping only those above the floor
    fn similarity_map(&self, user_id: UserId) -> Result<HashMap<UserId, f64>> {
        let target = self.user_ratings(user_id)?;
        let floor = self.config.similarity_floor();

        Ok(self
            .users
            .user_ids()
            .par_iter()
            .filter(|&&other| other != user_id)
            .filter_map(|&other| {
                let other_ratings = self.users.user_ratings(other)?;
                let sim = similarity(target, other_ratings)?;
                (sim > floor).then_some((other, sim))
            })
            .collect())
    }

    /// Turn a movie's raters into the neighbors used for its prediction.
    ///
    /// `similarity_to` yields the target's similarity to a given rater.
    /// The result is ascending by user id.
    fn select_neighbors<F>(
        &self,
        user_id: UserId,
        raters: &[Rating],
        similarity_to: F,
    ) -> Vec<Neighbor>
    where
        F: Fn(UserId) -> Option<f64> + Sync,
    {
        let floor = self.config.similarity_floor();

        let mut candidates: Vec<&Rating> = raters
            .iter()
            .filter(|rating| rating.user_id != user_id)
            .collect();
        candidates.sort_unstable_by_key(|rating| rating.user_id);

        let mut neighbors: Vec<Neighbor> = candidates
            .par_iter()
            .filter_map(|rating| {
                let sim = similarity_to(rating.user_id)?;
                (sim > floor).then_some(Neighbor {
                    user_id: rating.user_id,
                    similarity: sim,
                    score: rating.score,
                })
            })
            .collect();

        if let Some(k) = self.config.max_neighbors
            && neighbors.len() > k
        {
            neighbors.sort_by(|a, b| {
                b.similarity
                    .total_cmp(&a.similarity)
                    .then(a.user_id.cmp(&b.user_id))
            });
            neighbors.truncate(k);
            neighbors.sort_unstable_by_key(|n| n.user_id);
        }

        neighbors
    }
}
