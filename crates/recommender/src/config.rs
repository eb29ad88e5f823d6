//! Tuning knobs for neighbor selection.

use serde::{Deserialize, Serialize};

/// How neighbors are chosen for a prediction.
///
/// The defaults give the plain similarity-weighted average over every
/// positively correlated rater.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Neighbors must have similarity strictly above this.
    ///
    /// Never below 0.0: non-positive similarities are always excluded.
    pub min_similarity: f64,

    /// Keep only the k most similar neighbors. `None` keeps them all.
    pub max_neighbors: Option<usize>,
}

impl RecommenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the similarity floor (default: 0.0)
    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Configure the neighbor cap (default: unbounded)
    pub fn with_max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.max_neighbors = Some(max_neighbors);
        self
    }

    /// The floor actually applied.
    ///
    /// A negative or NaN setting falls back to 0.0.
    pub fn similarity_floor(&self) -> f64 {
        if self.min_similarity > 0.0 {
            self.min_similarity
        } else {
            0.0
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.0,
            max_neighbors: None,
        }
    }
}
