//! # Songmatch
//!
//! Song suggestions from two independent sources: listeners with similar
//! star ratings, and the valence/energy scores of each track.
//!
//! ## Usage
//!
//! ```bash
//! # Create the database and load a dataset, with demo listeners
//! songmatch init-db --csv dataset.csv --demo
//!
//! # Rate, then ask for suggestions
//! songmatch rate user1 42 5
//! songmatch recommend user1
//!
//! # Random songs for a mood
//! songmatch mood Energetic --limit 5
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use log::{debug, info};
use songmatch::cli::{self, Command};
use songmatch::collaborative::CollaborativeRecommender;
use songmatch::config::{self, RuntimeConfig};
use songmatch::db::{Database, Song, User};
use songmatch::ingest;
use songmatch::mood::MoodRecommender;
use std::path::Path;

/// Main entry point for the Songmatch application.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug songmatch recommend user1`
/// - `RUST_LOG=songmatch::collaborative=trace songmatch recommend user1`
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let open = || -> Result<(RuntimeConfig, Database)> {
        let config = resolve_config(args.db.as_deref(), args.config.as_deref())?;
        debug!("Runtime configuration: {config:?}");
        let db = Database::open(&config.db_path)?;
        Ok((config, db))
    };

    match args.command {
        Command::Completion { shell } => {
            songmatch::completion::generate_completions(shell, &mut std::io::stdout())
        }
        Command::InitDb { csv, demo } => {
            let (config, mut db) = open()?;
            info!("Initializing database at {}", config.db_path.display());
            db.init_schema()?;

            let csv = csv.map(|path| config::absolute_path(&path)).transpose()?;
            if let Some(path) = csv.or_else(|| config.csv_path.clone()) {
                let added = ingest::seed_from_csv(&mut db, &path)?;
                println!("Loaded {added} songs ({} in catalog)", db.song_count()?);
            }
            if demo {
                let added = ingest::seed_demo_ratings(
                    &db,
                    &mut rand::thread_rng(),
                    ingest::DEFAULT_DEMO_RATINGS,
                )?;
                println!("Generated {added} demo ratings");
            }
            db.close()
        }
        Command::AddUser { name } => {
            let (_, db) = open()?;
            match db.create_user(&name)? {
                Some(id) => println!("Created user `{name}` with id {id}"),
                None => bail!("Username `{name}` is already taken"),
            }
            db.close()
        }
        Command::Rate { user, song_id, rating } => {
            let (_, db) = open()?;
            let user = resolve_user(&db, &user)?;
            if db.get_song_by_id(song_id)?.is_none() {
                bail!("No song with id {song_id} in the catalog");
            }
            db.add_rating(user.id, song_id, rating)?;
            println!("Saved: {} rated song {song_id} with {rating} stars", user.username);
            db.close()
        }
        Command::Recommend { user, top_n, json } => {
            let (config, db) = open()?;
            let user = resolve_user(&db, &user)?;
            let top_n = top_n.unwrap_or(config.recommender.top_n);
            let songs = CollaborativeRecommender::new(config.recommender)
                .recommend(&db, &db, user.id, top_n)?;

            if songs.is_empty() && !json {
                println!("No suggestions for {} yet. Rate a few songs first.", user.username);
            } else {
                print_songs(&songs, json)?;
            }
            db.close()
        }
        Command::Mood { label, limit, seed, json } => {
            let (config, db) = open()?;
            let recommender = MoodRecommender::new(limit.unwrap_or(config.recommender.mood_limit));
            let songs = match seed {
                Some(seed) => recommender.recommend_seeded(&db, &label, seed)?,
                None => recommender.recommend(&db, &label)?,
            };
            print_songs(&songs, json)?;
            db.close()
        }
        Command::List { limit } => {
            let (_, db) = open()?;
            print_songs(&db.get_all_songs(limit)?, false)?;
            db.close()
        }
    }
}

/// Config file first, then `--db` on top of it.
fn resolve_config(db: Option<&Path>, config_file: Option<&Path>) -> Result<RuntimeConfig> {
    let mut config = match config_file {
        Some(path) => RuntimeConfig::load(&config::absolute_path(path)?)?,
        None => RuntimeConfig::new()?,
    };

    if let Some(db) = db {
        config.db_path = config::absolute_path(db)?;
    }
    Ok(config)
}

fn resolve_user(db: &Database, name: &str) -> Result<User> {
    match db.find_user(name)? {
        Some(user) => Ok(user),
        None => bail!("Unknown user `{name}`. Create it with `songmatch add-user {name}`"),
    }
}

fn print_songs(songs: &[Song], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(songs)?);
        return Ok(());
    }

    for song in songs {
        println!(
            "{:>6}  {} - {} [{}]  valence {:.2}  energy {:.2}",
            song.id, song.title, song.artist, song.genre, song.valence, song.energy
        );
    }
    Ok(())
}
