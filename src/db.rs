//! # Database Module
//!
//! SQLite storage for the song catalog, listener accounts and star ratings.
//! A [`Database`] owns exactly one connection for its whole lifetime; it is
//! opened once by the caller and closed when dropped.
//!
//! ## Schema
//!
//! - `users`: `id`, unique `username`
//! - `songs`: catalog rows with the four audio features (default `0.5`)
//! - `ratings`: `(user_id, song_id)` primary key, `rating` constrained to 1–5

use crate::mood::MoodRange;
use anyhow::{bail, Context, Result};
use log::{debug, info, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type UserId = i64;
pub type SongId = i64;

/// Lowest star rating a listener can give.
pub const MIN_RATING: u8 = 1;
/// Highest star rating a listener can give.
pub const MAX_RATING: u8 = 5;

/// How many songs `list` shows when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// A catalog entry as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub genre: String,
    /// Musical positiveness, 0.0 (sad) to 1.0 (cheerful).
    pub valence: f64,
    /// Perceived intensity, 0.0 (calm) to 1.0 (loud and fast).
    pub energy: f64,
    pub danceability: f64,
    pub acousticness: f64,
}

/// A song that has not been assigned an id yet. Produced by CSV ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
    pub acousticness: f64,
}

/// One explicit star rating. Unique per `(user_id, song_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub song_id: SongId,
    pub rating: u8,
}

impl Rating {
    #[must_use]
    pub const fn new(user_id: UserId, song_id: SongId, rating: u8) -> Self {
        Self { user_id, song_id, rating }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT    UNIQUE NOT NULL
    );
    CREATE TABLE IF NOT EXISTS songs (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        title        TEXT NOT NULL,
        artist       TEXT NOT NULL,
        genre        TEXT,
        valence      REAL DEFAULT 0.5,
        energy       REAL DEFAULT 0.5,
        danceability REAL DEFAULT 0.5,
        acousticness REAL DEFAULT 0.5
    );
    CREATE TABLE IF NOT EXISTS ratings (
        user_id INTEGER,
        song_id INTEGER,
        rating  INTEGER CHECK(rating >= 1 AND rating <= 5),
        PRIMARY KEY (user_id, song_id),
        FOREIGN KEY (user_id) REFERENCES users (id),
        FOREIGN KEY (song_id) REFERENCES songs (id)
    );
    CREATE INDEX IF NOT EXISTS idx_songs_mood ON songs(valence, energy);
";

const SONG_COLUMNS: &str =
    "id, title, artist, COALESCE(genre, 'Unknown'), valence, energy, danceability, acousticness";

/// Owns the SQLite connection used by every store and catalog operation.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path`.
    ///
    /// The schema is not touched; call [`Database::init_schema`] once after
    /// creating a fresh file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        debug!("Opened database at {}", path.display());
        Ok(Self { conn })
    }

    /// Open a private in-memory database with the schema already created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create the `users`, `songs` and `ratings` tables if they are missing.
    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("Failed to create database schema")?;
        info!("Database schema ready");
        Ok(())
    }

    /// Close the connection, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("Failed to close database connection")
    }

    /// Insert every song in one transaction. Returns how many rows were added.
    pub fn insert_songs(&mut self, songs: &[NewSong]) -> Result<usize> {
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO songs (title, artist, genre, valence, energy, danceability, acousticness)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for song in songs {
                stmt.execute(params![
                    song.title,
                    song.artist,
                    song.genre,
                    song.valence,
                    song.energy,
                    song.danceability,
                    song.acousticness,
                ])
                .with_context(|| format!("Failed to INSERT song: {song:?}"))?;
            }
        }

        tx.commit().context("Committing song transaction failed")?;
        info!("Inserted {} songs into catalog", songs.len());
        Ok(songs.len())
    }

    pub fn song_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))
            .context("Failed to count songs")?;
        usize::try_from(count).with_context(|| format!("Song count {count} is not a valid size"))
    }

    /// The first `limit` songs in id order, for browsing and rating.
    pub fn get_all_songs(&self, limit: usize) -> Result<Vec<Song>> {
        let sql = format!("SELECT {SONG_COLUMNS} FROM songs ORDER BY id LIMIT ?1");
        self.query_songs(&sql, params![sql_limit(limit)])
    }

    pub fn song_ids(&self) -> Result<Vec<SongId>> {
        let mut stmt = self.conn.prepare("SELECT id FROM songs ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))
            .context("Cannot query song ids")?
            .collect::<rusqlite::Result<Vec<SongId>>>()?;
        Ok(ids)
    }

    /// Look a song up by id. `Ok(None)` when no such song exists.
    pub fn get_song_by_id(&self, id: SongId) -> Result<Option<Song>> {
        let sql = format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1");
        self.conn
            .query_row(&sql, [id], song_from_row)
            .optional()
            .with_context(|| format!("Failed to query song {id}"))
    }

    /// Every rating triple currently stored.
    pub fn get_all_ratings(&self) -> Result<Vec<Rating>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, song_id, rating FROM ratings")?;
        let ratings = stmt
            .query_map([], |row| {
                Ok(Rating {
                    user_id: row.get(0)?,
                    song_id: row.get(1)?,
                    rating: row.get(2)?,
                })
            })
            .context("Cannot query ratings")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Queried rating row failed to decode")?;

        trace!("Loaded {} ratings", ratings.len());
        Ok(ratings)
    }

    /// Store a rating, replacing any earlier rating for the same pair.
    pub fn add_rating(&self, user_id: UserId, song_id: SongId, rating: u8) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            bail!("Rating {rating} is outside {MIN_RATING}..={MAX_RATING}");
        }

        self.conn
            .execute(
                "INSERT OR REPLACE INTO ratings (user_id, song_id, rating) VALUES (?1, ?2, ?3)",
                params![user_id, song_id, rating],
            )
            .with_context(|| {
                format!("Failed to store rating {rating} for song {song_id} by user {user_id}")
            })?;

        debug!("User {user_id} rated song {song_id} with {rating}");
        Ok(())
    }

    /// All songs whose valence and energy fall inside `range` (inclusive), by id.
    pub fn songs_in_mood_range(&self, range: &MoodRange) -> Result<Vec<Song>> {
        let sql = format!(
            "SELECT {SONG_COLUMNS} FROM songs
             WHERE valence BETWEEN ?1 AND ?2 AND energy BETWEEN ?3 AND ?4
             ORDER BY id"
        );
        self.query_songs(
            &sql,
            params![range.min_valence, range.max_valence, range.min_energy, range.max_energy],
        )
    }

    /// Up to `limit` songs from `range`, drawn with `rng`.
    ///
    /// Only the matching ids are loaded; full rows are fetched for the
    /// sampled songs alone.
    pub fn sample_songs_by_mood<R>(&self, range: &MoodRange, limit: usize, rng: &mut R) -> Result<Vec<Song>>
    where
        R: Rng + ?Sized,
    {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM songs
             WHERE valence BETWEEN ?1 AND ?2 AND energy BETWEEN ?3 AND ?4
             ORDER BY id",
        )?;
        let ids = stmt
            .query_map(
                params![range.min_valence, range.max_valence, range.min_energy, range.max_energy],
                |row| row.get(0),
            )
            .context("Cannot query song ids by mood")?
            .collect::<rusqlite::Result<Vec<SongId>>>()?;

        let mut songs = Vec::with_capacity(limit.min(ids.len()));
        for &id in ids.choose_multiple(rng, limit) {
            songs.extend(self.get_song_by_id(id)?);
        }
        trace!("Sampled {} of {} songs in {range:?}", songs.len(), ids.len());
        Ok(songs)
    }

    /// Up to `limit` songs from `range`, picked at random by SQLite.
    pub fn get_songs_by_mood_criteria(&self, range: &MoodRange, limit: usize) -> Result<Vec<Song>> {
        let sql = format!(
            "SELECT {SONG_COLUMNS} FROM songs
             WHERE valence BETWEEN ?1 AND ?2 AND energy BETWEEN ?3 AND ?4
             ORDER BY RANDOM() LIMIT ?5"
        );
        self.query_songs(
            &sql,
            params![
                range.min_valence,
                range.max_valence,
                range.min_energy,
                range.max_energy,
                sql_limit(limit),
            ],
        )
    }

    /// Register a listener. `Ok(None)` if the username is already taken.
    pub fn create_user(&self, username: &str) -> Result<Option<UserId>> {
        let changed = self
            .conn
            .execute("INSERT OR IGNORE INTO users (username) VALUES (?1)", [username])
            .with_context(|| format!("Failed to create user `{username}`"))?;

        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(self.conn.last_insert_rowid()))
    }

    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()
            .with_context(|| format!("Failed to look up user `{username}`"))
    }

    fn query_songs(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Song>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .with_context(|| format!("Invalid SQL statement: {sql}"))?;

        let songs = stmt
            .query_map(params, song_from_row)
            .context("Cannot query songs")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Queried song row failed to decode")?;

        Ok(songs)
    }
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        genre: row.get(3)?,
        valence: row.get(4)?,
        energy: row.get(5)?,
        danceability: row.get(6)?,
        acousticness: row.get(7)?,
    })
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
