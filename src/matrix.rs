//! Dense user × song rating matrix.
//!
//! Rows are every user with at least one rating, columns every song that
//! somebody rated, both in ascending id order. A pair nobody rated holds
//! `0.0`, which is indistinguishable from an explicit zero.

use crate::db::{Rating, SongId, UserId};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct UserItemMatrix {
    users: Vec<UserId>,
    songs: Vec<SongId>,
    rows: Vec<Vec<f64>>,
    user_index: HashMap<UserId, usize>,
}

impl UserItemMatrix {
    /// Pivot rating triples into a dense matrix.
    ///
    /// Repeated triples for one `(user, song)` pair are averaged.
    #[must_use]
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let users: Vec<UserId> = ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let songs: Vec<SongId> = ratings
            .iter()
            .map(|r| r.song_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<UserId, usize> =
            users.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let song_index: HashMap<SongId, usize> =
            songs.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut sums = vec![vec![0.0_f64; songs.len()]; users.len()];
        let mut counts = vec![vec![0_u32; songs.len()]; users.len()];
        for rating in ratings {
            let (row, col) = (user_index[&rating.user_id], song_index[&rating.song_id]);
            sums[row][col] += f64::from(rating.rating);
            counts[row][col] += 1;
        }

        let rows: Vec<Vec<f64>> = sums
            .into_iter()
            .zip(counts)
            .map(|(sum_row, count_row)| {
                sum_row
                    .into_iter()
                    .zip(count_row)
                    .map(|(sum, count)| if count == 0 { 0.0 } else { sum / f64::from(count) })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self { users, songs, rows, user_index }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// User ids in row order.
    #[must_use]
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Song ids in column order.
    #[must_use]
    pub fn songs(&self) -> &[SongId] {
        &self.songs
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[must_use]
    pub fn index_of(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    #[must_use]
    pub fn row(&self, user_id: UserId) -> Option<&[f64]> {
        self.index_of(user_id).map(|i| self.rows[i].as_slice())
    }

    /// `(song, value)` for every column of `user_id`'s row, zeros included.
    pub fn cells(&self, user_id: UserId) -> impl Iterator<Item = (SongId, f64)> + '_ {
        self.row(user_id)
            .unwrap_or_default()
            .iter()
            .zip(&self.songs)
            .map(|(&value, &song)| (song, value))
    }
}
