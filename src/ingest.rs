//! # Catalog Ingestion
//!
//! Loads a song dataset CSV into the catalog. Datasets in the wild name
//! their columns differently, so every row is normalised once here into a
//! [`NewSong`]; nothing downstream ever sees a raw row.
//!
//! ## Column Mapping
//!
//! | field   | first choice  | fallback      | column absent      |
//! |---------|---------------|---------------|--------------------|
//! | title   | `track_name`  | `song_name`   | `"Unknown Title"`  |
//! | artist  | `artists`     | `artist_name` | `"Unknown Artist"` |
//! | genre   | `track_genre` | `genre`       | `"Pop"`            |
//!
//! Blank text cells become `"Unknown"`, except a title of only whitespace,
//! which becomes `"Unknown Title"`. Blank or unparseable `valence`,
//! `energy`, `danceability` and `acousticness` cells become `0.5`. A UTF-8
//! byte order mark in front of the header is ignored.

use crate::db::{Database, NewSong, MAX_RATING};
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_FEATURE: f64 = 0.5;
const UNKNOWN: &str = "Unknown";
const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const DEFAULT_GENRE: &str = "Pop";
const BOM: char = '\u{feff}';

/// Listeners created by [`seed_demo_ratings`].
pub const DEMO_USERS: [&str; 3] = ["user1", "user2", "user3"];
/// Demo ratings are drawn from this range, inclusive.
pub const DEMO_MIN_RATING: u8 = 3;
/// How many random ratings `init-db --demo` generates.
pub const DEFAULT_DEMO_RATINGS: usize = 100;

/// Header positions, resolved once per file.
struct ColumnMap {
    index: HashMap<String, usize>,
}

impl ColumnMap {
    fn new(header: &StringRecord) -> Self {
        let index = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim_start_matches(BOM).trim().to_string(), i))
            .collect();
        Self { index }
    }

    /// First of `names` present in the header.
    fn resolve(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.index.get(*name).copied())
    }
}

/// Trimmed cell content, `None` when the cell is blank or missing.
fn cell(row: &StringRecord, column: usize) -> Option<&str> {
    row.get(column).map(str::trim).filter(|value| !value.is_empty())
}

/// Text cell, `"Unknown"` when blank; `absent` when the column does not exist.
fn text_cell(row: &StringRecord, column: Option<usize>, absent: &str) -> String {
    match column {
        None => absent.to_string(),
        Some(i) => cell(row, i).unwrap_or(UNKNOWN).to_string(),
    }
}

/// An empty title cell counts as missing data (`"Unknown"`); a title of only
/// whitespace becomes `"Unknown Title"`.
fn title_cell(row: &StringRecord, column: Option<usize>) -> String {
    let Some(i) = column else {
        return UNKNOWN_TITLE.to_string();
    };
    match row.get(i) {
        None | Some("") => UNKNOWN.to_string(),
        Some(_) => cell(row, i).unwrap_or(UNKNOWN_TITLE).to_string(),
    }
}

fn feature_cell(row: &StringRecord, column: Option<usize>) -> f64 {
    column
        .and_then(|i| cell(row, i))
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_FEATURE)
}

/// Normalise CSV text into typed songs.
pub fn parse_songs(text: &str) -> Result<Vec<NewSong>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers().context("Failed to read dataset header")?;
    if header.iter().all(|name| name.trim_start_matches(BOM).trim().is_empty()) {
        bail!("Song dataset is empty: missing header row");
    }

    let columns = ColumnMap::new(header);
    let title = columns.resolve(&["track_name", "song_name"]);
    let artist = columns.resolve(&["artists", "artist_name"]);
    let genre = columns.resolve(&["track_genre", "genre"]);
    let valence = columns.resolve(&["valence"]);
    let energy = columns.resolve(&["energy"]);
    let danceability = columns.resolve(&["danceability"]);
    let acousticness = columns.resolve(&["acousticness"]);

    if valence.is_none() || energy.is_none() {
        warn!("Dataset has no valence/energy columns; every song gets the neutral mood 0.5");
    }

    let mut songs = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let row = record.with_context(|| format!("Malformed dataset record {}", line + 1))?;
        songs.push(NewSong {
            title: title_cell(&row, title),
            artist: text_cell(&row, artist, UNKNOWN_ARTIST),
            genre: text_cell(&row, genre, DEFAULT_GENRE),
            valence: feature_cell(&row, valence),
            energy: feature_cell(&row, energy),
            danceability: feature_cell(&row, danceability),
            acousticness: feature_cell(&row, acousticness),
        });
    }

    debug!("Parsed {} songs from dataset", songs.len());
    Ok(songs)
}

/// Load `path` into an empty catalog. Returns the number of songs inserted.
///
/// Does nothing when the catalog already holds songs, and only warns when the
/// file is missing.
pub fn seed_from_csv(db: &mut Database, path: &Path) -> Result<usize> {
    if !path.exists() {
        warn!("Song dataset {} not found, catalog left empty", path.display());
        return Ok(0);
    }

    if db.song_count()? > 0 {
        info!("Catalog already populated, skipping {}", path.display());
        return Ok(0);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read song dataset {}", path.display()))?;
    let songs = parse_songs(&text)
        .with_context(|| format!("Failed to parse song dataset {}", path.display()))?;

    info!("Loading {} songs from {}", songs.len(), path.display());
    db.insert_songs(&songs)
}

/// Create the demo listeners and `count` random ratings between
/// [`DEMO_MIN_RATING`] and 5 over random catalog songs.
///
/// Existing demo users are reused; a repeated `(user, song)` draw overwrites
/// the earlier rating.
pub fn seed_demo_ratings<R: Rng + ?Sized>(db: &Database, rng: &mut R, count: usize) -> Result<usize> {
    let mut user_ids = Vec::with_capacity(DEMO_USERS.len());
    for name in DEMO_USERS {
        db.create_user(name)?;
        let user = db
            .find_user(name)?
            .with_context(|| format!("Demo user `{name}` vanished after creation"))?;
        user_ids.push(user.id);
    }

    let song_ids = db.song_ids()?;
    if song_ids.is_empty() {
        warn!("Catalog is empty, no demo ratings generated");
        return Ok(0);
    }

    for _ in 0..count {
        let (Some(&user_id), Some(&song_id)) = (user_ids.choose(rng), song_ids.choose(rng)) else {
            break;
        };
        let rating = rng.gen_range(DEMO_MIN_RATING..=MAX_RATING);
        db.add_rating(user_id, song_id, rating)?;
    }

    info!("Generated {count} demo ratings for {} users", user_ids.len());
    Ok(count)
}
