use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default player name when none is given
pub const DEFAULT_PLAYER: &str = "Player";
/// Default upper bound of the guessing range
pub const DEFAULT_MAX_NUMBER: i64 = 100;
/// Default attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Immutable session parameters.
///
/// Constructed once at session start; out-of-range input falls back to the
/// documented defaults instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub player_name: String,
    pub max_number: i64,
    pub max_attempts: u32,
}

impl GameConfig {
    /// Build a config, recovering from invalid input with defaults.
    ///
    /// Blank name becomes `"Player"`, `max_number < 2` becomes 100,
    /// `max_attempts < 1` becomes 10.
    pub fn new(player_name: impl Into<String>, max_number: i64, max_attempts: u32) -> Self {
        let player_name = player_name.into();
        let player_name = if player_name.trim().is_empty() {
            DEFAULT_PLAYER.to_string()
        } else {
            player_name.trim().to_string()
        };

        Self {
            player_name,
            max_number: if max_number < 2 { DEFAULT_MAX_NUMBER } else { max_number },
            max_attempts: if max_attempts < 1 { DEFAULT_MAX_ATTEMPTS } else { max_attempts },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER, DEFAULT_MAX_NUMBER, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Terminal status of a recorded game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    InProgress,
    Won,
    Lost,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::InProgress => "in_progress",
            GameResult::Won => "won",
            GameResult::Lost => "lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(GameResult::InProgress),
            "won" => Some(GameResult::Won),
            "lost" => Some(GameResult::Lost),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

/// Durable projection of a session, in-progress or finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Assigned by the store on first persist, stable thereafter
    pub id: i64,
    pub player_name: String,
    pub max_number: i64,
    pub secret_number: i64,
    pub max_attempts: u32,
    pub attempts_count: u32,
    pub result: GameResult,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Derived per-player aggregate over completed games.
///
/// The attempts-to-win aggregates are `None` when the player has no wins;
/// reporting them as 0 would be misleading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_name: String,
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage, rounded to 1 decimal; 0 when no completed games
    pub win_rate: f64,
    /// Mean attempts over won games, rounded to 2 decimals
    pub avg_attempts_to_win: Option<f64>,
    pub min_attempts_to_win: Option<u32>,
    pub max_attempts_to_win: Option<u32>,
}
