//! Error types for the recommender crate.
//!
//! Only caller mistakes are errors. A prediction or similarity that cannot
//! be computed from the data is `Ok(None)`, not an `Err`.

use data_loader::{MovieId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// The user lookup has no user with this id
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// The movie lookup has no movie with this id
    #[error("Movie {0} not found")]
    MovieNotFound(MovieId),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
