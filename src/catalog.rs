//! Collaborator seams between the recommenders and storage.
//!
//! The recommenders only read through these traits, so they can run against
//! the SQLite [`Database`] in production and against plain vectors in tests.

use crate::db::{Database, Rating, Song, SongId, UserId, MAX_RATING, MIN_RATING};
use crate::mood::MoodRange;
use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::cell::RefCell;

/// Source of explicit star ratings.
pub trait RatingStore {
    /// Every `(user, song, rating)` triple currently known.
    fn all_ratings(&self) -> Result<Vec<Rating>>;

    /// Insert a rating, replacing any earlier one for the same pair.
    fn upsert_rating(&self, user_id: UserId, song_id: SongId, rating: u8) -> Result<()>;
}

/// Read access to the song catalog.
pub trait SongCatalog {
    /// `Ok(None)` when the id is unknown; that is not an error.
    fn song_by_id(&self, id: SongId) -> Result<Option<Song>>;

    /// Every song whose valence and energy both lie within `range`, inclusive.
    fn songs_in_range(&self, range: &MoodRange) -> Result<Vec<Song>>;

    /// Up to `limit` distinct songs from `range`, drawn with `rng`.
    ///
    /// The default loads every match, which is the whole catalog for an
    /// unknown mood, and samples in memory.
    fn sample_in_range(&self, range: &MoodRange, limit: usize, rng: &mut dyn RngCore) -> Result<Vec<Song>> {
        let matches = self.songs_in_range(range)?;
        Ok(matches.choose_multiple(rng, limit).cloned().collect())
    }
}

impl RatingStore for Database {
    fn all_ratings(&self) -> Result<Vec<Rating>> {
        self.get_all_ratings()
    }

    fn upsert_rating(&self, user_id: UserId, song_id: SongId, rating: u8) -> Result<()> {
        self.add_rating(user_id, song_id, rating)
    }
}

impl SongCatalog for Database {
    fn song_by_id(&self, id: SongId) -> Result<Option<Song>> {
        self.get_song_by_id(id)
    }

    fn songs_in_range(&self, range: &MoodRange) -> Result<Vec<Song>> {
        self.songs_in_mood_range(range)
    }

    fn sample_in_range(&self, range: &MoodRange, limit: usize, rng: &mut dyn RngCore) -> Result<Vec<Song>> {
        self.sample_songs_by_mood(range, limit, rng)
    }
}

/// An in-memory rating set, mostly useful for tests and benchmarks.
impl RatingStore for RefCell<Vec<Rating>> {
    fn all_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.borrow().clone())
    }

    fn upsert_rating(&self, user_id: UserId, song_id: SongId, rating: u8) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            bail!("Rating {rating} is outside {MIN_RATING}..={MAX_RATING}");
        }

        let mut ratings = self.borrow_mut();
        match ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.song_id == song_id)
        {
            Some(existing) => existing.rating = rating,
            None => ratings.push(Rating::new(user_id, song_id, rating)),
        }
        Ok(())
    }
}

/// A fixed catalog held in memory.
impl SongCatalog for [Song] {
    fn song_by_id(&self, id: SongId) -> Result<Option<Song>> {
        Ok(self.iter().find(|song| song.id == id).cloned())
    }

    fn songs_in_range(&self, range: &MoodRange) -> Result<Vec<Song>> {
        Ok(self.iter().filter(|song| range.contains(song)).cloned().collect())
    }
}

impl SongCatalog for Vec<Song> {
    fn song_by_id(&self, id: SongId) -> Result<Option<Song>> {
        self.as_slice().song_by_id(id)
    }

    fn songs_in_range(&self, range: &MoodRange) -> Result<Vec<Song>> {
        self.as_slice().songs_in_range(range)
    }
}
