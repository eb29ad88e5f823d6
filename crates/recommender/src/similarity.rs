//! User-user similarity over co-rated movies.

use crate::correlation::pearson;
use data_loader::{MovieId, Rating, Score};
use std::collections::BTreeMap;

/// Pearson similarity between two users, given their ratings.
///
/// Only movies both users rated take part. Score pairs are formed in
/// ascending movie-id order, so the result is reproducible and
/// `similarity(a, b) == similarity(b, a)` holds exactly.
///
/// Returns `None` when the users share no movies or when the correlation
/// itself is undefined (for example, one side gave every shared movie the
/// same score).
pub fn similarity(a: &[Rating], b: &[Rating]) -> Option<f64> {
    let pairs = shared_score_pairs(a, b);
    if pairs.is_empty() {
        return None;
    }
    pearson(&pairs)
}

/// `(score_a, score_b)` for every movie both sides rated, by movie id.
pub fn shared_score_pairs(a: &[Rating], b: &[Rating]) -> Vec<(Score, Score)> {
    let scores_a: BTreeMap<MovieId, Score> = a.iter().map(|r| (r.movie_id, r.score)).collect();
    let scores_b: BTreeMap<MovieId, Score> = b.iter().map(|r| (r.movie_id, r.score)).collect();

    scores_a
        .iter()
        .filter_map(|(movie_id, &score_a)| {
            scores_b.get(movie_id).map(|&score_b| (score_a, score_b))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(user_id: u32, scores: &[(MovieId, Score)]) -> Vec<Rating> {
        scores
            .iter()
            .map(|&(movie_id, score)| Rating::new(user_id, movie_id, score))
            .collect()
    }

    #[test]
    fn test_shared_pairs_sorted_by_movie() {
        let a = ratings(1, &[(30, 1), (10, 5), (20, 3), (40, 2)]);
        let b = ratings(2, &[(20, 4), (50, 1), (10, 2), (30, 3)]);

        assert_eq!(shared_score_pairs(&a, &b), vec![(5, 2), (3, 4), (1, 3)]);
    }

    #[test]
    fn test_no_overlap_is_undefined() {
        let a = ratings(1, &[(1, 5), (2, 4)]);
        let b = ratings(2, &[(3, 5), (4, 4)]);
        assert_eq!(similarity(&a, &b), None);
    }

    #[test]
    fn test_empty_user_is_undefined() {
        let a = ratings(1, &[(1, 5), (2, 4)]);
        assert_eq!(similarity(&a, &[]), None);
        assert_eq!(similarity(&[], &a), None);
    }

    #[test]
    fn test_identical_taste() {
        let a = ratings(1, &[(1, 5), (2, 3), (3, 1)]);
        let b = ratings(2, &[(1, 5), (2, 3), (3, 1), (4, 2)]);
        assert_eq!(similarity(&a, &b), Some(1.0));
    }

    #[test]
    fn test_opposite_taste() {
        let a = ratings(1, &[(1, 1), (2, 2), (3, 3)]);
        let b = ratings(2, &[(1, 3), (2, 2), (3, 1)]);
        assert_eq!(similarity(&a, &b), Some(-1.0));
    }

    #[test]
    fn test_single_shared_movie_is_undefined() {
        let a = ratings(1, &[(1, 5), (2, 1)]);
        let b = ratings(2, &[(1, 4), (3, 2)]);
        assert_eq!(similarity(&a, &b), None);
    }

    #[test]
    fn test_symmetric() {
        let a = ratings(1, &[(1, 5), (2, 3), (3, 4), (4, 1), (6, 2)]);
        let b = ratings(2, &[(1, 4), (2, 1), (3, 5), (4, 2), (5, 3)]);

        let ab = similarity(&a, &b);
        let ba = similarity(&b, &a);
        assert!(ab.is_some());
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let a = ratings(1, &[(1, 5), (2, 3), (3, 4), (4, 1)]);
        let mut shuffled = a.clone();
        shuffled.reverse();
        let b = ratings(2, &[(4, 2), (3, 5), (2, 1), (1, 4)]);

        assert_eq!(similarity(&a, &b), similarity(&shuffled, &b));
    }
}
