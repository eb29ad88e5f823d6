//! # Recommender Crate
//!
//! User-based collaborative filtering: predict the score a user would give
//! a movie from the scores of users whose taste correlates with theirs.
//!
//! ## Components
//!
//! ### Correlation engine
//! [`correlation::pearson`] computes the Pearson coefficient of paired
//! observations and returns `None` instead of dividing by zero.
//!
//! ### Similarity
//! [`similarity::similarity`] correlates two users over the movies they
//! both rated. It is a free function of two rating views, so
//! `similarity(a, b) == similarity(b, a)` by construction.
//!
//! ### Recommender
//! [`Recommender`] is handed [`UserLookup`] and [`MovieLookup`]
//! capabilities and predicts scores as a similarity-weighted average over
//! positively correlated neighbors. It also ranks similar users and
//! recommends unrated movies.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use recommender::Recommender;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data/ml-100k".as_ref())?);
//! let recommender = Recommender::from_index(data_index);
//!
//! match recommender.predict_rating(1, 1682)? {
//!     Some(score) => println!("Predicted {:.2}", score),
//!     None => println!("Cannot predict"),
//! }
//! ```
//!
//! "Cannot compute" is always `Ok(None)`. `Err` is reserved for ids the
//! lookups don't know.

pub mod config;
pub mod correlation;
pub mod error;
pub mod lookup;
pub mod recommender;
pub mod similarity;

pub use config::RecommenderConfig;
pub use correlation::pearson;
pub use error::{RecommendError, Result};
pub use lookup::{MovieLookup, UserLookup};
pub use recommender::{Neighbor, Prediction, Recommender, ScoredMovie, weighted_average};
pub use similarity::similarity;

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{MovieId, Rating, UserId};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// Ratings kept in plain maps, to check the recommender doesn't depend
    /// on `DataIndex`
    #[derive(Default)]
    struct MapStore {
        by_user: BTreeMap<UserId, Vec<Rating>>,
        by_movie: BTreeMap<MovieId, Vec<Rating>>,
    }

    impl MapStore {
        fn rate(&mut self, user_id: UserId, movie_id: MovieId, score: i32) {
            let rating = Rating::new(user_id, movie_id, score);
            self.by_user.entry(user_id).or_default().push(rating);
            self.by_movie.entry(movie_id).or_default().push(rating);
        }
    }

    impl UserLookup for MapStore {
        fn user_ratings(&self, user_id: UserId) -> Option<&[Rating]> {
            self.by_user.get(&user_id).map(|v| v.as_slice())
        }

        fn user_ids(&self) -> Vec<UserId> {
            self.by_user.keys().copied().collect()
        }
    }

    impl MovieLookup for MapStore {
        fn movie_ratings(&self, movie_id: MovieId) -> Option<&[Rating]> {
            self.by_movie.get(&movie_id).map(|v| v.as_slice())
        }

        fn movie_ids(&self) -> Vec<MovieId> {
            self.by_movie.keys().copied().collect()
        }
    }

    #[test]
    fn test_custom_lookups() {
        let mut store = MapStore::default();
        for (movie_id, score) in [(1, 2), (2, 4), (3, 5)] {
            store.rate(1, movie_id, score);
            store.rate(2, movie_id, score);
        }
        store.rate(2, 4, 3);

        let store = Arc::new(store);
        let recommender = Recommender::new(store.clone(), store);

        assert_eq!(recommender.similarity(1, 2).unwrap(), Some(1.0));
        assert_eq!(recommender.predict_rating(1, 4).unwrap(), Some(3.0));
    }

    #[test]
    fn test_reexports() {
        assert_eq!(pearson(&[(1, 1), (2, 2), (3, 3)]), Some(1.0));
        assert_eq!(weighted_average(&[]), None);
        assert_eq!(similarity(&[], &[]), None);
    }
}
