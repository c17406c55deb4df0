//! Per-player record of finished games
//!
//! Keeps the best score, the number of games played and the most recent
//! games, newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of games kept per player
pub const HISTORY_CAPACITY: usize = 20;

/// Default number of games shown in listings
pub const DEFAULT_LISTING: usize = 5;

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub score: u32,
    pub duration_secs: u64,
    pub played_at: DateTime<Utc>,
}

/// Score history of a single player
///
/// # Example
///
/// ```rust
/// use grid_snake::history::ScoreHistory;
///
/// let mut history = ScoreHistory::new();
/// history.record(40, 12);
/// history.record(10, 3);
///
/// assert_eq!(history.high_score(), 40);
/// assert_eq!(history.total_games(), 2);
/// assert_eq!(history.recent(1)[0].score, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistory {
    high_score: u32,
    total_games: u32,
    /// Newest first, at most [`HISTORY_CAPACITY`] entries
    history: VecDeque<GameRecord>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a game that finished just now
    pub fn record(&mut self, score: u32, duration_secs: u64) -> &GameRecord {
        self.record_at(score, duration_secs, Utc::now())
    }

    /// Record a game finished at `played_at`
    pub fn record_at(
        &mut self,
        score: u32,
        duration_secs: u64,
        played_at: DateTime<Utc>,
    ) -> &GameRecord {
        self.high_score = self.high_score.max(score);
        self.total_games += 1;

        self.history.push_front(GameRecord {
            score,
            duration_secs,
            played_at,
        });
        self.history.truncate(HISTORY_CAPACITY);

        &self.history[0]
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Games ever recorded, including those that fell out of the history
    pub fn total_games(&self) -> u32 {
        self.total_games
    }

    /// Up to `limit` most recent games, newest first
    pub fn recent(&self, limit: usize) -> Vec<&GameRecord> {
        self.history.iter().take(limit).collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
