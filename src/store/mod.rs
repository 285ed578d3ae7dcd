pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::core::{Attempt, GameConfig, GameRecord, GameResult, PlayerStats};
use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Trait for durable game/attempt persistence backends.
///
/// Listing order is id descending (most recent first) for every list
/// operation. Attempt ordering is validated by the store: an append whose
/// `attempt_number` is not `current count + 1` is rejected rather than
/// overwriting.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Persist a new in-progress game, returning its stable id
    async fn create_game(&self, config: &GameConfig, secret: i64) -> Result<i64>;

    /// Persist one attempt for an existing game
    async fn append_attempt(&self, game_id: i64, attempt: &Attempt) -> Result<()>;

    /// Set the terminal fields of a game.
    ///
    /// Idempotent for identical values; a differing re-completion is a store
    /// error.
    async fn complete_game(&self, game_id: i64, result: GameResult, attempts_count: u32)
        -> Result<()>;

    /// All games, including in-progress ones
    async fn list_games(&self) -> Result<Vec<GameRecord>>;

    /// Won games only
    async fn list_won(&self) -> Result<Vec<GameRecord>>;

    /// Completed games that were not won
    async fn list_lost(&self) -> Result<Vec<GameRecord>>;

    /// Fetch one game; `None` when the id is unknown
    async fn get_game(&self, game_id: i64) -> Result<Option<GameRecord>>;

    /// Attempts of one game in ascending attempt number; empty when unknown
    async fn get_attempts(&self, game_id: i64) -> Result<Vec<Attempt>>;

    /// Per-player aggregates over completed games only
    async fn player_stats(&self) -> Result<Vec<PlayerStats>>;
}
