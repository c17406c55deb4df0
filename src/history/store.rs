//! JSON file holding the score history of every player on this machine

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::score_history::{GameRecord, ScoreHistory};

/// Score histories keyed by player name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryBook {
    players: BTreeMap<String, ScoreHistory>,
}

impl HistoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the book from `path`; a missing file is an empty book
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(?path, "no history file yet");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history from {:?}", path))?;
        let book: HistoryBook = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse history in {:?}", path))?;

        info!(?path, players = book.players.len(), "history loaded");
        Ok(book)
    }

    /// Write the book to `path` as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize history")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history to {:?}", path))?;

        debug!(?path, "history saved");
        Ok(())
    }

    /// Add a finished game to `player`'s history
    pub fn record(&mut self, player: &str, score: u32, duration_secs: u64) -> &GameRecord {
        self.players
            .entry(player.to_string())
            .or_default()
            .record(score, duration_secs)
    }

    /// History of `player`, if they ever finished a game
    pub fn player(&self, player: &str) -> Option<&ScoreHistory> {
        self.players.get(player)
    }

    /// Best score of `player`, zero for unknown players
    pub fn high_score(&self, player: &str) -> u32 {
        self.player(player).map_or(0, ScoreHistory::high_score)
    }

    /// Up to `limit` recent games of `player`, newest first
    pub fn recent(&self, player: &str, limit: usize) -> Vec<&GameRecord> {
        self.player(player)
            .map(|history| history.recent(limit))
            .unwrap_or_default()
    }
}
