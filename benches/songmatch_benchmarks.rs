//! # Songmatch Performance Benchmarks
//!
//! - **Similarity**: pairwise cosine over growing user counts
//! - **Collaborative**: end-to-end candidate scoring
//! - **Mood**: range filter plus sampling against SQLite
//!
//! ```bash
//! cargo bench
//! cargo bench similarity
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use songmatch::collaborative::CollaborativeRecommender;
use songmatch::db::{Database, NewSong, Rating};
use songmatch::matrix::UserItemMatrix;
use songmatch::mood::MoodRecommender;
use songmatch::similarity::SimilarityMatrix;

/// Deterministic sparse ratings: every user rates about a tenth of the songs.
fn create_ratings(users: i64, songs: i64) -> Vec<Rating> {
    (1..=users)
        .flat_map(|user| {
            (1..=songs)
                .filter(move |song| (user * 31 + song * 17) % 10 == 0)
                .map(move |song| Rating::new(user, song, ((user + song) % 5 + 1) as u8))
        })
        .collect()
}

fn benchmark_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");

    for users in [10, 50, 200] {
        let matrix = UserItemMatrix::from_ratings(&create_ratings(users, 500));
        group.bench_with_input(BenchmarkId::new("pairwise_cosine", users), &matrix, |b, m| {
            b.iter(|| SimilarityMatrix::from_matrix(black_box(m)))
        });
    }

    let ratings = create_ratings(200, 500);
    group.bench_function("pivot_200x500", |b| {
        b.iter(|| UserItemMatrix::from_ratings(black_box(&ratings)))
    });

    group.finish();
}

fn benchmark_collaborative(c: &mut Criterion) {
    let mut group = c.benchmark_group("collaborative");
    let recommender = CollaborativeRecommender::default();

    for users in [10, 100] {
        let ratings = create_ratings(users, 1000);
        group.bench_with_input(BenchmarkId::new("score_candidates", users), &ratings, |b, r| {
            b.iter(|| recommender.score_candidates(black_box(r), black_box(1)))
        });
    }

    group.finish();
}

fn benchmark_mood(c: &mut Criterion) {
    let mut db = Database::open_in_memory().expect("Failed to open database");
    let songs: Vec<NewSong> = (0..1000)
        .map(|i| NewSong {
            title: format!("Song {i:04}"),
            artist: format!("Artist {}", i / 20),
            genre: "Pop".to_string(),
            valence: f64::from(i % 101) / 100.0,
            energy: f64::from((i * 7) % 101) / 100.0,
            danceability: 0.5,
            acousticness: 0.5,
        })
        .collect();
    db.insert_songs(&songs).expect("Failed to insert songs");

    let recommender = MoodRecommender::default();
    let mut group = c.benchmark_group("mood");
    for label in ["Happy", "Chill", "Unknown"] {
        group.bench_function(label, |b| {
            b.iter(|| recommender.recommend_seeded(&db, black_box(label), 1).expect("mood query"))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_similarity, benchmark_collaborative, benchmark_mood);
criterion_main!(benches);
