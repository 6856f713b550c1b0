//! # Configuration Module
//!
//! Data directory setup and the tunable knobs of both recommenders.
//!
//! ## Data Storage
//!
//! Songmatch stores its database in the platform-standard data directory:
//! - Linux: `~/.local/share/songmatch/`
//! - macOS: `~/Library/Application Support/songmatch/`
//! - Windows: `%APPDATA%\songmatch\`
//!
//! ## Config File
//!
//! `--config <file>` points at a JSON document; any field left out keeps its
//! default:
//!
//! ```json
//! { "db_path": "/srv/songmatch.db", "recommender": { "neighbor_count": 10 } }
//! ```

use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How many most-similar listeners feed collaborative scoring.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;
/// A neighbour's rating must reach this to count as a recommendation.
pub const DEFAULT_LIKE_THRESHOLD: u8 = 4;
/// Length of a collaborative recommendation list.
pub const DEFAULT_TOP_N: usize = 5;
/// Upper bound on a mood sample.
pub const DEFAULT_MOOD_LIMIT: usize = 10;

/// Returns the platform-appropriate database file path, creating the
/// `songmatch` data directory if needed.
///
/// # Errors
///
/// Fails if the system data directory cannot be determined or created.
///
/// # Examples
///
/// ```no_run
/// use songmatch::config::get_db_path;
///
/// let db_path = get_db_path()?;
/// println!("Database location: {}", db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("songmatch.db"))
}

/// Returns the songmatch data directory, creating it if it does not exist.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    let app_dir = data_dir.join("songmatch");
    fs::create_dir_all(&app_dir)
        .with_context(|| format!(
            "Failed to create data directory at {}. Please check file permissions.",
            app_dir.display()
        ))?;

    Ok(app_dir)
}

/// Resolve a user-supplied path against the current directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = path
        .absolutize()
        .with_context(|| format!("Failed to resolve path {}", path.display()))?;
    Ok(absolute.into_owned())
}

/// Tuning for both recommenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub neighbor_count: usize,
    pub like_threshold: u8,
    pub top_n: usize,
    pub mood_limit: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            like_threshold: DEFAULT_LIKE_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            mood_limit: DEFAULT_MOOD_LIMIT,
        }
    }
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the database file
    pub db_path: PathBuf,
    /// Song dataset used to seed an empty catalog
    pub csv_path: Option<PathBuf>,
    pub recommender: RecommenderConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            db_path: get_db_path().unwrap_or_else(|_| PathBuf::from("songmatch.db")),
            csv_path: None,
            recommender: RecommenderConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Create a new runtime configuration
    pub fn new() -> Result<Self> {
        Ok(Self {
            db_path: get_db_path()?,
            ..Self::with_db_path(PathBuf::new())
        })
    }

    /// Create configuration with explicit database path
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            db_path,
            csv_path: None,
            recommender: RecommenderConfig::default(),
        }
    }

    /// Read a JSON config file. Relative paths inside it are made absolute.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        config.db_path = absolute_path(&config.db_path)?;
        if let Some(csv) = &config.csv_path {
            config.csv_path = Some(absolute_path(csv)?);
        }
        Ok(config)
    }
}
