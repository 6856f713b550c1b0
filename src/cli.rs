//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `songmatch` binary.
//!
//! ## Commands
//!
//! - `init-db`: Create the schema and load a song dataset
//! - `add-user`: Register a listener
//! - `rate`: Give a song 1–5 stars
//! - `recommend`: Collaborative suggestions for a listener
//! - `mood`: Random songs matching a mood
//! - `list`: Browse the catalog
//!
//! ## Examples
//!
//! ```bash
//! songmatch init-db --csv dataset.csv --demo
//! songmatch rate user1 42 5
//! songmatch recommend user1 --top-n 10
//! songmatch mood Chill
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "songmatch")]
#[command(about = "Songmatch: song suggestions from star ratings & mood scores")]
#[command(version)]
pub struct Args {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "SONGMATCH_DB", value_hint = clap::ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true, env = "SONGMATCH_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and load the song catalog
    ///
    /// The dataset is only read when the catalog is empty, so running
    /// init-db twice is harmless.
    InitDb {
        /// Song dataset CSV
        ///
        /// Recognised columns: track_name/song_name, artists/artist_name,
        /// track_genre/genre, valence, energy, danceability, acousticness.
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        csv: Option<PathBuf>,

        /// Also create user1..user3 with random ratings
        #[arg(long)]
        demo: bool,
    },

    /// Register a new listener
    AddUser {
        /// Unique username
        name: String,
    },

    /// Rate a song from 1 to 5 stars
    ///
    /// Rating the same song again replaces the earlier rating.
    Rate {
        /// Username of the listener
        user: String,

        /// Catalog id of the song
        song_id: i64,

        /// Stars, 1 to 5
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },

    /// Suggest songs liked by listeners with similar taste
    ///
    /// Listeners without any ratings get no suggestions yet.
    Recommend {
        /// Username of the listener
        user: String,

        /// Maximum number of songs to suggest
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Print songs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick random songs for a mood
    ///
    /// Known moods: Happy, Sad, Chill, Energetic. Any other label picks from
    /// the whole catalog.
    Mood {
        /// Mood label
        label: String,

        /// Maximum number of songs to pick
        #[arg(short, long)]
        limit: Option<usize>,

        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,

        /// Print songs as JSON
        #[arg(long)]
        json: bool,
    },

    /// List songs in the catalog
    List {
        /// Maximum number of songs to show
        #[arg(short, long, default_value_t = crate::db::DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// Generate shell completions
    ///
    /// Usage: songmatch completion bash > ~/.local/share/bash-completion/completions/songmatch
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
