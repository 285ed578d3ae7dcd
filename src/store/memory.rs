use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::{Attempt, GameConfig, GameRecord, GameResult, PlayerStats};
use crate::error::{GameError, Result};
use crate::stats;
use crate::store::GameStore;

#[derive(Default)]
struct Inner {
    next_id: i64,
    games: HashMap<i64, GameRecord>,
    attempts: HashMap<i64, Vec<Attempt>>,
}

/// In-process reference implementation of [`GameStore`].
///
/// Same contract as [`crate::store::SqliteStore`]; stats go through
/// [`crate::stats::aggregate`]. Mostly useful as a fast test double.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn list_filtered(&self, filter: impl Fn(&GameRecord) -> bool) -> Vec<GameRecord> {
        let inner = self.inner.lock().unwrap();
        let mut games: Vec<GameRecord> =
            inner.games.values().filter(|g| filter(g)).cloned().collect();
        games.sort_by(|a, b| b.id.cmp(&a.id));
        games
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn create_game(&self, config: &GameConfig, secret: i64) -> Result<i64> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;

        inner.games.insert(
            id,
            GameRecord {
                id,
                player_name: config.player_name.clone(),
                max_number: config.max_number,
                secret_number: secret,
                max_attempts: config.max_attempts,
                attempts_count: 0,
                result: GameResult::InProgress,
                started_at: Utc::now(),
                completed_at: None,
            },
        );
        inner.attempts.insert(id, Vec::new());

        Ok(id)
    }

    async fn append_attempt(&self, game_id: i64, attempt: &Attempt) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.games.contains_key(&game_id) {
            return Err(GameError::NotFound(game_id));
        }

        let log = inner.attempts.entry(game_id).or_default();
        let expected = log.len() as u32 + 1;
        if attempt.attempt_number != expected {
            return Err(GameError::Store(format!(
                "attempt {} for game {} is out of order (expected {})",
                attempt.attempt_number, game_id, expected
            )));
        }
        log.push(attempt.clone());

        if let Some(game) = inner.games.get_mut(&game_id) {
            game.attempts_count = attempt.attempt_number;
        }

        Ok(())
    }

    async fn complete_game(
        &self,
        game_id: i64,
        result: GameResult,
        attempts_count: u32,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let game = inner
            .games
            .get_mut(&game_id)
            .ok_or(GameError::NotFound(game_id))?;

        if game.result.is_completed() {
            if game.result == result && game.attempts_count == attempts_count {
                return Ok(());
            }
            return Err(GameError::Store(format!(
                "game {} is already completed as {}",
                game_id,
                game.result.as_str()
            )));
        }

        game.result = result;
        game.attempts_count = attempts_count;
        game.completed_at = Some(Utc::now());

        Ok(())
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>> {
        Ok(self.list_filtered(|_| true))
    }

    async fn list_won(&self) -> Result<Vec<GameRecord>> {
        Ok(self.list_filtered(|g| g.result == GameResult::Won))
    }

    async fn list_lost(&self) -> Result<Vec<GameRecord>> {
        Ok(self.list_filtered(|g| g.result == GameResult::Lost))
    }

    async fn get_game(&self, game_id: i64) -> Result<Option<GameRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.games.get(&game_id).cloned())
    }

    async fn get_attempts(&self, game_id: i64) -> Result<Vec<Attempt>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.attempts.get(&game_id).cloned().unwrap_or_default())
    }

    async fn player_stats(&self) -> Result<Vec<PlayerStats>> {
        let records = self.list_filtered(|_| true);
        Ok(stats::aggregate(&records))
    }
}
