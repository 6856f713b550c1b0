//! Cosine similarity between listeners' rating rows.

use crate::db::UserId;
use crate::matrix::UserItemMatrix;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Cosine of the angle between `a` and `b`.
///
/// Defined as `0.0` when either vector has zero magnitude, so an empty
/// rating row never produces NaN. The result is clamped to `[-1, 1]`.
///
/// # Examples
///
/// ```
/// use songmatch::similarity::cosine_similarity;
///
/// assert_eq!(cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]), 1.0);
/// assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
/// ```
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "rating rows must have equal length");

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Symmetric user × user similarity table, rows in the matrix's user order.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    users: Vec<UserId>,
    values: Vec<Vec<f64>>,
}

/// Another listener and how closely their ratings track the target's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f64,
}

impl SimilarityMatrix {
    /// Compare every pair of rows, self included. Rows are computed in parallel.
    #[must_use]
    pub fn from_matrix(matrix: &UserItemMatrix) -> Self {
        let rows = matrix.rows();
        let values: Vec<Vec<f64>> = rows
            .par_iter()
            .map(|a| rows.iter().map(|b| cosine_similarity(a, b)).collect::<Vec<_>>())
            .collect();

        Self {
            users: matrix.users().to_vec(),
            values,
        }
    }

    #[must_use]
    pub fn get(&self, a: UserId, b: UserId) -> Option<f64> {
        let i = self.users.binary_search(&a).ok()?;
        let j = self.users.binary_search(&b).ok()?;
        Some(self.values[i][j])
    }

    /// The `count` users most similar to `user_id`, never `user_id` itself.
    ///
    /// Ordered by similarity descending, then user id ascending. Users with
    /// zero or negative similarity still qualify.
    #[must_use]
    pub fn neighbors(&self, user_id: UserId, count: usize) -> Vec<Neighbor> {
        let Ok(row) = self.users.binary_search(&user_id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<Neighbor> = self
            .users
            .iter()
            .zip(&self.values[row])
            .filter(|(other, _)| **other != user_id)
            .map(|(&other, &similarity)| Neighbor { user_id: other, similarity })
            .collect();

        neighbors.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.user_id.cmp(&b.user_id))
        });
        neighbors.truncate(count);
        neighbors
    }
}
