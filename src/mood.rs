//! Mood-based selection over the valence/energy plane.
//!
//! | mood      | valence    | energy     |
//! |-----------|------------|------------|
//! | Happy     | 0.6 – 1.0  | 0.6 – 1.0  |
//! | Sad       | 0.0 – 0.4  | 0.0 – 0.4  |
//! | Chill     | 0.5 – 1.0  | 0.0 – 0.5  |
//! | Energetic | 0.0 – 1.0  | 0.7 – 1.0  |
//! | other     | 0.0 – 1.0  | 0.0 – 1.0  |
//!
//! Bounds are inclusive. Any label outside the table, including an empty
//! one, samples the whole catalog.

use crate::catalog::SongCatalog;
use crate::config::DEFAULT_MOOD_LIMIT;
use crate::db::Song;
use anyhow::{Context, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive rectangle on the valence/energy plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodRange {
    pub min_valence: f64,
    pub max_valence: f64,
    pub min_energy: f64,
    pub max_energy: f64,
}

impl MoodRange {
    pub const FULL: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(min_valence: f64, max_valence: f64, min_energy: f64, max_energy: f64) -> Self {
        Self { min_valence, max_valence, min_energy, max_energy }
    }

    #[must_use]
    pub fn contains(&self, song: &Song) -> bool {
        (self.min_valence..=self.max_valence).contains(&song.valence)
            && (self.min_energy..=self.max_energy).contains(&song.energy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Chill,
    Energetic,
    /// Unrecognised label: no filtering.
    Any,
}

impl Mood {
    pub const ALL: [Self; 5] = [Self::Happy, Self::Sad, Self::Chill, Self::Energetic, Self::Any];

    /// Map a label to a mood. Matching is exact; anything else is [`Mood::Any`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Happy" => Self::Happy,
            "Sad" => Self::Sad,
            "Chill" => Self::Chill,
            "Energetic" => Self::Energetic,
            _ => Self::Any,
        }
    }

    #[must_use]
    pub const fn range(self) -> MoodRange {
        match self {
            Self::Happy => MoodRange::new(0.6, 1.0, 0.6, 1.0),
            Self::Sad => MoodRange::new(0.0, 0.4, 0.0, 0.4),
            Self::Chill => MoodRange::new(0.5, 1.0, 0.0, 0.5),
            Self::Energetic => MoodRange::new(0.0, 1.0, 0.7, 1.0),
            Self::Any => MoodRange::FULL,
        }
    }
}

impl From<&str> for Mood {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Chill => "Chill",
            Self::Energetic => "Energetic",
            Self::Any => "Any",
        };
        f.write_str(name)
    }
}

/// Picks a random handful of songs matching a mood.
#[derive(Debug, Clone, Copy)]
pub struct MoodRecommender {
    limit: usize,
}

impl Default for MoodRecommender {
    fn default() -> Self {
        Self::new(DEFAULT_MOOD_LIMIT)
    }
}

impl MoodRecommender {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Up to `limit` songs for `label`, unseeded.
    pub fn recommend<C>(&self, catalog: &C, label: &str) -> Result<Vec<Song>>
    where
        C: SongCatalog + ?Sized,
    {
        self.recommend_with_rng(catalog, label, &mut rand::thread_rng())
    }

    /// Same as [`MoodRecommender::recommend`], reproducible for a given seed.
    pub fn recommend_seeded<C>(&self, catalog: &C, label: &str, seed: u64) -> Result<Vec<Song>>
    where
        C: SongCatalog + ?Sized,
    {
        self.recommend_with_rng(catalog, label, &mut StdRng::seed_from_u64(seed))
    }

    pub fn recommend_with_rng<C, R>(&self, catalog: &C, label: &str, rng: &mut R) -> Result<Vec<Song>>
    where
        C: SongCatalog + ?Sized,
        R: Rng,
    {
        let mood = Mood::from_label(label);
        let picked = catalog
            .sample_in_range(&mood.range(), self.limit, rng)
            .with_context(|| format!("Failed to query songs for mood {mood}"))?;

        debug!("Mood `{label}` ({mood}): picked {} songs", picked.len());
        Ok(picked)
    }
}

/// Convenience wrapper with the default limit.
pub fn recommend_by_mood<C>(catalog: &C, label: &str) -> Result<Vec<Song>>
where
    C: SongCatalog + ?Sized,
{
    MoodRecommender::default().recommend(catalog, label)
}
