//! High score leaderboard
//!
//! Global Top-10 table, validated the same way on every submission and
//! persisted as JSON. The engine only consults it at game over.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::score::DEFAULT_ACHIEVEMENT;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest stored player name (characters)
pub const MAX_NAME_CHARS: usize = 18;
/// Longest stored achievement label (characters)
pub const MAX_ACHIEVEMENT_CHARS: usize = 32;
/// Scores above this are clamped
pub const MAX_SCORE: u32 = 99_999_999;
/// Name used when none survives cleaning
pub const DEFAULT_NAME: &str = "Unknown";

/// Reason sent back when a score doesn't make the table
pub const REASON_NOT_TOP10: &str = "not_top10";

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("invalid score")]
    InvalidScore,
    #[error("leaderboard storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed leaderboard data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub achievement: String,
    /// Unix timestamp (ms) when stored
    pub timestamp: f64,
}

/// Score submission as received from a client. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub score: Option<f64>,
    pub achievement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub stored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub scores: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoresResponse {
    pub scores: Vec<ScoreEntry>,
}

/// Whether `score` earns a place in `entries` (sorted best first)
pub fn qualifies(entries: &[ScoreEntry], score: u32) -> bool {
    if entries.len() < MAX_HIGH_SCORES {
        return true;
    }
    entries
        .get(MAX_HIGH_SCORES - 1)
        .map(|tenth| score > tenth.score)
        .unwrap_or(true)
}

fn clean_text(raw: Option<&str>, max_chars: usize, fallback: &str) -> String {
    let cleaned: String = raw
        .unwrap_or("")
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_control())
        .take(max_chars)
        .collect();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Trim, strip control characters and cap a player name
pub fn clean_name(raw: Option<&str>) -> String {
    clean_text(raw, MAX_NAME_CHARS, DEFAULT_NAME)
}

/// Same treatment for the milestone label
pub fn clean_achievement(raw: Option<&str>) -> String {
    clean_text(raw, MAX_ACHIEVEMENT_CHARS, DEFAULT_ACHIEVEMENT)
}

/// Floor and clamp a submitted score; non-finite or negative is rejected
pub fn clean_score(raw: f64) -> Result<u32, LeaderboardError> {
    if !raw.is_finite() {
        return Err(LeaderboardError::InvalidScore);
    }
    let floored = raw.floor();
    if floored < 0.0 {
        return Err(LeaderboardError::InvalidScore);
    }
    Ok(floored.min(MAX_SCORE as f64) as u32)
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn qualifies(&self, score: u32) -> bool {
        qualifies(&self.entries, score)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an already-cleaned entry if it qualifies.
    /// Returns the rank achieved (1-indexed) or None.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties keep the older entry first
        let pos = self.entries.iter().position(|e| {
            entry.score > e.score || (entry.score == e.score && entry.timestamp < e.timestamp)
        });
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Validate a raw submission and store it if it makes the table
    pub fn submit(
        &mut self,
        request: &SubmitRequest,
        timestamp: f64,
    ) -> Result<SubmitResponse, LeaderboardError> {
        let score = clean_score(request.score.unwrap_or(f64::NAN)).inspect_err(|_| {
            log::warn!("Rejected score submission: {:?}", request.score);
        })?;
        let entry = ScoreEntry {
            name: clean_name(request.name.as_deref()),
            score,
            achievement: clean_achievement(request.achievement.as_deref()),
            timestamp,
        };

        let stored = match self.insert(entry) {
            Some(rank) => {
                log::info!("Stored score {} at rank {}", score, rank);
                true
            }
            None => {
                log::debug!("Score {} did not make the top {}", score, MAX_HIGH_SCORES);
                false
            }
        };

        Ok(SubmitResponse {
            stored,
            reason: (!stored).then(|| REASON_NOT_TOP10.to_string()),
            scores: self.entries.clone(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file, re-sorting and capping whatever was stored
    pub fn load(path: &Path) -> Result<Self, LeaderboardError> {
        let json = std::fs::read_to_string(path)?;
        let stored: HighScores = serde_json::from_str(&json)?;

        let mut scores = Self::new();
        for entry in stored.entries {
            scores.insert(entry);
        }
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Missing or unreadable file starts fresh
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(scores) => scores,
            Err(LeaderboardError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not load high scores from {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Storage side of the leaderboard exchange
pub trait LeaderboardService {
    fn get_scores(&self) -> Result<ScoresResponse, LeaderboardError>;
    fn submit_score(&mut self, request: &SubmitRequest) -> Result<SubmitResponse, LeaderboardError>;
}

/// Leaderboard kept in a JSON file, rewritten after every stored score
#[derive(Debug, Clone)]
pub struct FileLeaderboard {
    path: PathBuf,
    scores: HighScores,
}

impl FileLeaderboard {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = HighScores::load_or_default(&path);
        Self { path, scores }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl LeaderboardService for FileLeaderboard {
    fn get_scores(&self) -> Result<ScoresResponse, LeaderboardError> {
        Ok(ScoresResponse {
            scores: self.scores.entries.clone(),
        })
    }

    fn submit_score(&mut self, request: &SubmitRequest) -> Result<SubmitResponse, LeaderboardError> {
        let response = self.scores.submit(request, now_ms())?;
        if response.stored {
            self.scores.save(&self.path)?;
        }
        Ok(response)
    }
}

/// Wall clock in Unix milliseconds
fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
