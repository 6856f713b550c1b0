//! User-based collaborative filtering over explicit star ratings.
//!
//! ## Algorithm
//!
//! 1. Pivot every rating into a dense user × song matrix (unrated = 0).
//! 2. Cosine-compare every pair of user rows.
//! 3. Take the `neighbor_count` users closest to the target.
//! 4. Every song a neighbour rated at least `like_threshold`, and the target
//!    has not rated, earns `similarity × rating`; scores add up across
//!    neighbours.
//! 5. Highest score first, ties by ascending song id.
//!
//! A listener with no ratings (cold start) gets an empty list.

use crate::catalog::{RatingStore, SongCatalog};
use crate::config::RecommenderConfig;
use crate::db::{Rating, Song, SongId, UserId};
use crate::matrix::UserItemMatrix;
use crate::similarity::SimilarityMatrix;
use anyhow::{Context, Result};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// A candidate song and the evidence accumulated for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSong {
    pub song_id: SongId,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CollaborativeRecommender {
    config: RecommenderConfig,
}

impl CollaborativeRecommender {
    #[must_use]
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Recommend up to `top_n` songs for `user_id`, best first.
    ///
    /// Ids the catalog cannot resolve are dropped without replacement, so the
    /// list may be shorter than `top_n`.
    pub fn recommend<S, C>(
        &self,
        store: &S,
        catalog: &C,
        user_id: UserId,
        top_n: usize,
    ) -> Result<Vec<Song>>
    where
        S: RatingStore + ?Sized,
        C: SongCatalog + ?Sized,
    {
        let ratings = store
            .all_ratings()
            .context("Failed to fetch ratings for collaborative filtering")?;

        let mut songs = Vec::new();
        for candidate in self.score_candidates(&ratings, user_id).into_iter().take(top_n) {
            match catalog.song_by_id(candidate.song_id)? {
                Some(song) => songs.push(song),
                None => debug!("Song {} is not in the catalog, skipping", candidate.song_id),
            }
        }

        debug!("Recommended {} songs for user {user_id}", songs.len());
        Ok(songs)
    }

    /// Every candidate for `user_id`, ranked. Pure function of `ratings`.
    #[must_use]
    pub fn score_candidates(&self, ratings: &[Rating], user_id: UserId) -> Vec<ScoredSong> {
        let matrix = UserItemMatrix::from_ratings(ratings);
        if matrix.index_of(user_id).is_none() {
            debug!("User {user_id} has no ratings yet, nothing to recommend");
            return Vec::new();
        }

        let similarities = SimilarityMatrix::from_matrix(&matrix);
        let neighbors = similarities.neighbors(user_id, self.config.neighbor_count);
        trace!("Neighbours of user {user_id}: {neighbors:?}");

        let listened: HashSet<SongId> = matrix
            .cells(user_id)
            .filter(|&(_, value)| value > 0.0)
            .map(|(song, _)| song)
            .collect();
        let like_threshold = f64::from(self.config.like_threshold);

        let mut scores: HashMap<SongId, f64> = HashMap::new();
        for neighbor in &neighbors {
            for (song_id, rating) in matrix.cells(neighbor.user_id) {
                if rating >= like_threshold && !listened.contains(&song_id) {
                    *scores.entry(song_id).or_insert(0.0) += neighbor.similarity * rating;
                }
            }
        }

        rank(scores)
    }
}

/// Highest score first; equal scores fall back to ascending song id.
fn rank(scores: HashMap<SongId, f64>) -> Vec<ScoredSong> {
    let mut ranked: Vec<ScoredSong> = scores
        .into_iter()
        .map(|(song_id, score)| ScoredSong { song_id, score })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.song_id.cmp(&b.song_id))
    });
    ranked
}

/// Convenience wrapper using the default tuning.
pub fn recommend_collaborative<S, C>(
    store: &S,
    catalog: &C,
    user_id: UserId,
    top_n: usize,
) -> Result<Vec<Song>>
where
    S: RatingStore + ?Sized,
    C: SongCatalog + ?Sized,
{
    CollaborativeRecommender::default().recommend(store, catalog, user_id, top_n)
}
