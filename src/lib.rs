//! Song recommendations from star ratings and mood scores.
//!
//! Core modules:
//! - [`collaborative`] - User-based collaborative filtering
//! - [`mood`] - Mood → valence/energy ranges and random sampling
//! - [`matrix`] - Dense user × song rating matrix
//! - [`similarity`] - Cosine similarity and neighbour selection
//! - [`catalog`] - Traits the recommenders read through
//! - [`db`] - SQLite catalog, users and ratings
//!
//! ### Supporting Modules
//!
//! - [`ingest`] - CSV dataset normalisation and demo data
//! - [`config`] - Data directory and recommender tuning
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use songmatch::collaborative::recommend_collaborative;
//! use songmatch::db::{Database, NewSong};
//! use songmatch::mood::recommend_by_mood;
//!
//! let mut db = Database::open_in_memory()?;
//! let song = |title: &str, valence, energy| NewSong {
//!     title: title.to_string(),
//!     artist: "Artist".to_string(),
//!     genre: "Pop".to_string(),
//!     valence,
//!     energy,
//!     danceability: 0.5,
//!     acousticness: 0.5,
//! };
//! db.insert_songs(&[song("Rain", 0.1, 0.2), song("Sunrise", 0.9, 0.8), song("Drift", 0.7, 0.3)])?;
//!
//! let alice = db.create_user("alice")?.unwrap();
//! let bob = db.create_user("bob")?.unwrap();
//! db.add_rating(alice, 1, 5)?;
//! db.add_rating(bob, 1, 5)?;
//! db.add_rating(bob, 3, 4)?;
//!
//! let for_alice = recommend_collaborative(&db, &db, alice, 5)?;
//! assert_eq!(for_alice[0].title, "Drift");
//!
//! let sad = recommend_by_mood(&db, "Sad")?;
//! assert_eq!(sad.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Algorithm Details
//!
//! ### Collaborative
//! - Pivots all ratings into a user × song matrix, unrated cells as 0
//! - Picks the 5 listeners with the most similar rating rows (cosine)
//! - Scores each song those neighbours rated 4+ by `similarity × rating`
//! - Never suggests a song the listener already rated
//!
//! ### Mood
//! - Maps Happy / Sad / Chill / Energetic to a valence × energy rectangle
//! - Unknown labels cover the whole plane
//! - Returns a random sample of at most 10 matching songs
//!
//! ## Error Handling
//!
//! All fallible functions return `anyhow::Result`. A listener without
//! ratings, an unknown mood, or a rated song missing from the catalog are
//! not errors; they shrink or widen the result instead.

pub mod catalog;
pub mod cli;
pub mod collaborative;
pub mod completion;
pub mod config;
pub mod db;
pub mod ingest;
pub mod matrix;
pub mod mood;
pub mod similarity;
