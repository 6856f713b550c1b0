//! # Integration Tests for Songmatch
//!
//! End-to-end checks against a real SQLite file: seeding from CSV, rating,
//! both recommenders, and the CLI binary itself.

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use songmatch::collaborative::{recommend_collaborative, CollaborativeRecommender};
use songmatch::config::RecommenderConfig;
use songmatch::db::{Database, Song};
use songmatch::ingest;
use songmatch::mood::{Mood, MoodRecommender};

const DATASET: &str = "\
track_name,artists,track_genre,valence,energy,danceability,acousticness
Rainy Window,Ana,acoustic,0.1,0.1,0.3,0.9
Sunrise Run,Ben,pop,0.9,0.9,0.8,0.1
Slow Tide,Cora,ambient,0.7,0.2,0.4,0.7
\"Go, Go, Go\",Dev,edm,0.5,0.95,0.9,0.05
Grey Morning,Eli,folk,0.3,0.35,0.2,0.8
Fallback Row,Fay,,,,,
";

/// Test helper to create a temporary database seeded from [`DATASET`]
fn create_test_database() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test_songmatch.db");
    let csv_path = temp_dir.path().join("dataset.csv");
    std::fs::write(&csv_path, DATASET)?;

    let mut db = Database::open(&db_path)?;
    db.init_schema()?;
    ingest::seed_from_csv(&mut db, &csv_path)?;
    db.close()?;

    Ok((temp_dir, db_path))
}

#[cfg(test)]
mod database_integration_tests {
    use super::*;

    #[test]
    fn test_seeded_catalog_is_normalised() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;
        let db = Database::open(&db_path)?;

        assert_eq!(db.song_count()?, 6);

        let quoted = db.get_song_by_id(4)?.expect("song 4 exists");
        assert_eq!(quoted.title, "Go, Go, Go");

        let fallback = db.get_song_by_id(6)?.expect("song 6 exists");
        assert_eq!(fallback.genre, "Unknown");
        assert_eq!((fallback.valence, fallback.energy), (0.5, 0.5));
        Ok(())
    }

    #[test]
    fn test_ratings_survive_reopen() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;

        let db = Database::open(&db_path)?;
        let user = db.create_user("alice")?.expect("fresh user");
        db.add_rating(user, 2, 3)?;
        db.add_rating(user, 2, 4)?;
        db.close()?;

        let db = Database::open(&db_path)?;
        let ratings = db.get_all_ratings()?;
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating, 4);
        Ok(())
    }
}

#[cfg(test)]
mod recommendation_integration_tests {
    use super::*;

    fn rate_all(db: &Database, user: &str, ratings: &[(i64, u8)]) -> Result<i64> {
        let id = db.create_user(user)?.expect("fresh user");
        for &(song, stars) in ratings {
            db.add_rating(id, song, stars)?;
        }
        Ok(id)
    }

    #[test]
    fn test_collaborative_against_sqlite() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;
        let db = Database::open(&db_path)?;

        let alice = rate_all(&db, "alice", &[(1, 5), (2, 5)])?;
        rate_all(&db, "bob", &[(1, 5), (2, 5), (3, 4)])?;
        rate_all(&db, "cara", &[(3, 1), (5, 5)])?;

        let recs = recommend_collaborative(&db, &db, alice, 5)?;
        let ids: Vec<_> = recs.iter().map(|s| s.id).collect();

        assert_eq!(ids.first(), Some(&3));
        assert!(!ids.contains(&1) && !ids.contains(&2));
        Ok(())
    }

    #[test]
    fn test_rated_song_missing_from_catalog_is_skipped() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;
        let db = Database::open(&db_path)?;

        let alice = rate_all(&db, "alice", &[(1, 5)])?;
        rate_all(&db, "bob", &[(1, 5), (2, 5), (3, 4)])?;

        // song 2 would rank first but the catalog no longer knows it
        let catalog: Vec<Song> = db
            .get_all_songs(100)?
            .into_iter()
            .filter(|song| song.id != 2)
            .collect();

        let recs = CollaborativeRecommender::new(RecommenderConfig::default())
            .recommend(&db, &catalog, alice, 5)?;
        let ids: Vec<_> = recs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);
        Ok(())
    }

    #[test]
    fn test_new_listener_gets_nothing() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;
        let db = Database::open(&db_path)?;

        rate_all(&db, "bob", &[(1, 5), (3, 4)])?;
        let newcomer = db.create_user("newcomer")?.expect("fresh user");

        assert!(recommend_collaborative(&db, &db, newcomer, 5)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_mood_results_stay_in_range() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;
        let db = Database::open(&db_path)?;
        let recommender = MoodRecommender::default();

        for label in ["Happy", "Sad", "Chill", "Energetic", "Whatever"] {
            let range = Mood::from_label(label).range();
            for song in recommender.recommend(&db, label)? {
                assert!(range.contains(&song), "{label}: {song:?}");
            }
        }

        let sad: HashSet<_> = recommender.recommend(&db, "Sad")?.iter().map(|s| s.id).collect();
        assert_eq!(sad, HashSet::from([1, 5]));
        Ok(())
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn songmatch(db_path: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_songmatch"))
            .arg("--db")
            .arg(db_path)
            .args(args)
            .env_remove("SONGMATCH_CONFIG")
            .output()
            .expect("Failed to run songmatch")
    }

    #[test]
    fn test_cli_help_displays_correctly() {
        let output = Command::new(env!("CARGO_BIN_EXE_songmatch"))
            .arg("--help")
            .output()
            .expect("Failed to run help command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("songmatch"));
        assert!(stdout.contains("recommend"));
        assert!(stdout.contains("mood"));
        assert!(stdout.contains("init-db"));
    }

    #[test]
    fn test_completion_never_opens_database() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("untouched.db");

        let output = songmatch(&db_path, &["completion", "bash"]);
        assert!(output.status.success(), "{output:?}");
        assert!(String::from_utf8_lossy(&output.stdout).contains("_songmatch"));
        assert!(!db_path.exists());
        Ok(())
    }

    #[test]
    fn test_rate_then_recommend_workflow() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;

        for user in ["alice", "bob"] {
            assert!(songmatch(&db_path, &["add-user", user]).status.success());
        }
        assert!(!songmatch(&db_path, &["add-user", "alice"]).status.success());

        for (user, song, stars) in [("alice", "1", "5"), ("bob", "1", "5"), ("bob", "3", "4")] {
            let output = songmatch(&db_path, &["rate", user, song, stars]);
            assert!(output.status.success(), "{output:?}");
        }

        let output = songmatch(&db_path, &["recommend", "alice", "--json"]);
        assert!(output.status.success());
        let songs: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(songs[0]["title"], "Slow Tide");
        Ok(())
    }

    #[test]
    fn test_rate_unknown_song_fails() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;
        assert!(songmatch(&db_path, &["add-user", "alice"]).status.success());

        let output = songmatch(&db_path, &["rate", "alice", "4242", "5"]);
        assert!(!output.status.success());
        Ok(())
    }

    #[test]
    fn test_seeded_mood_is_reproducible() -> Result<()> {
        let (_temp_dir, db_path) = create_test_database()?;

        let first = songmatch(&db_path, &["mood", "Any", "--seed", "9", "--limit", "3"]);
        let second = songmatch(&db_path, &["mood", "Any", "--seed", "9", "--limit", "3"]);

        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);
        assert_eq!(String::from_utf8_lossy(&first.stdout).lines().count(), 3);
        Ok(())
    }
}
