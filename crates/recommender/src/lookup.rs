//! Read access the recommender needs from the storage layer.
//!
//! The recommender is handed these capabilities instead of reaching for a
//! shared store, so any backing (the in-memory `DataIndex`, a test fake,
//! a cache in front of a database) can be plugged in.

use data_loader::{DataIndex, MovieId, Rating, UserId};

/// Look up users and the ratings they made.
pub trait UserLookup: Send + Sync {
    /// All ratings made by `user_id`.
    ///
    /// `None` if the user doesn't exist; an empty slice if they exist but
    /// have rated nothing.
    fn user_ratings(&self, user_id: UserId) -> Option<&[Rating]>;

    /// Every known user id, ascending
    fn user_ids(&self) -> Vec<UserId>;
}

/// Look up movies and the ratings they received.
pub trait MovieLookup: Send + Sync {
    /// All ratings received by `movie_id`.
    ///
    /// `None` if the movie doesn't exist.
    fn movie_ratings(&self, movie_id: MovieId) -> Option<&[Rating]>;

    /// Every known movie id, ascending
    fn movie_ids(&self) -> Vec<MovieId>;
}

impl UserLookup for DataIndex {
    fn user_ratings(&self, user_id: UserId) -> Option<&[Rating]> {
        self.get_user(user_id)
            .map(|_| self.get_user_ratings(user_id))
    }

    fn user_ids(&self) -> Vec<UserId> {
        DataIndex::user_ids(self)
    }
}

impl MovieLookup for DataIndex {
    fn movie_ratings(&self, movie_id: MovieId) -> Option<&[Rating]> {
        self.get_movie(movie_id)
            .map(|_| self.get_movie_ratings(movie_id))
    }

    fn movie_ids(&self) -> Vec<MovieId> {
        DataIndex::movie_ids(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, User};

    #[test]
    fn test_data_index_distinguishes_missing_from_unrated() {
        let mut index = DataIndex::new();
        index.insert_user(User::new(1));
        index.insert_movie(Movie::new(10, "Heat"));

        assert_eq!(UserLookup::user_ratings(&index, 1), Some(&[][..]));
        assert_eq!(UserLookup::user_ratings(&index, 2), None);
        assert_eq!(MovieLookup::movie_ratings(&index, 10), Some(&[][..]));
        assert_eq!(MovieLookup::movie_ratings(&index, 11), None);
    }

    #[test]
    fn test_data_index_ids() {
        let mut index = DataIndex::new();
        index.insert_user(User::new(3));
        index.insert_user(User::new(1));
        index.insert_movie(Movie::new(7, "Fargo"));

        assert_eq!(UserLookup::user_ids(&index), vec![1, 3]);
        assert_eq!(MovieLookup::movie_ids(&index), vec![7]);
    }
}
