use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::{Attempt, GameConfig, GameRecord, GameResult, Outcome, PlayerStats};
use crate::error::{GameError, Result};
use crate::stats::round_to;
use crate::store::GameStore;

/// SQLite-based game store.
///
/// Schema:
/// ```sql
/// CREATE TABLE games (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     player_name TEXT NOT NULL,
///     max_number INTEGER NOT NULL,
///     secret_number INTEGER NOT NULL,
///     max_attempts INTEGER NOT NULL,
///     attempts_count INTEGER NOT NULL DEFAULT 0,
///     result TEXT NOT NULL DEFAULT 'in_progress',
///     started_at TEXT NOT NULL,
///     completed_at TEXT
/// );
/// CREATE TABLE attempts (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
///     attempt_number INTEGER NOT NULL,
///     guessed_value INTEGER NOT NULL,
///     outcome TEXT NOT NULL
/// );
/// ```
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at `db_path`; `:memory:` for tests
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "PRAGMA foreign_keys = ON;

             CREATE TABLE IF NOT EXISTS games (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 player_name TEXT NOT NULL,
                 max_number INTEGER NOT NULL,
                 secret_number INTEGER NOT NULL,
                 max_attempts INTEGER NOT NULL,
                 attempts_count INTEGER NOT NULL DEFAULT 0,
                 result TEXT NOT NULL DEFAULT 'in_progress',
                 started_at TEXT NOT NULL,
                 completed_at TEXT
             );

             CREATE TABLE IF NOT EXISTS attempts (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
                 attempt_number INTEGER NOT NULL,
                 guessed_value INTEGER NOT NULL,
                 outcome TEXT NOT NULL
             );

             CREATE INDEX IF NOT EXISTS idx_attempts_game
                 ON attempts(game_id, attempt_number);",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_game(row: &Row<'_>) -> rusqlite::Result<GameRecord> {
        let result_str: String = row.get(6)?;
        let result = GameResult::from_str(&result_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown game result: {}", result_str).into(),
            )
        })?;

        let started_at: String = row.get(7)?;
        let started_at = parse_timestamp(7, &started_at)?;

        let completed_at: Option<String> = row.get(8)?;
        let completed_at = match completed_at {
            Some(s) => Some(parse_timestamp(8, &s)?),
            None => None,
        };

        Ok(GameRecord {
            id: row.get(0)?,
            player_name: row.get(1)?,
            max_number: row.get(2)?,
            secret_number: row.get(3)?,
            max_attempts: row.get(4)?,
            attempts_count: row.get(5)?,
            result,
            started_at,
            completed_at,
        })
    }

    fn list_where(&self, filter: &str) -> Result<Vec<GameRecord>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT id, player_name, max_number, secret_number, max_attempts,
                    attempts_count, result, started_at, completed_at
             FROM games {} ORDER BY id DESC",
            filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let games = stmt
            .query_map([], Self::row_to_game)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[async_trait]
impl GameStore for SqliteStore {
    async fn create_game(&self, config: &GameConfig, secret: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO games (player_name, max_number, secret_number, max_attempts,
                                attempts_count, result, started_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
            params![
                config.player_name,
                config.max_number,
                secret,
                config.max_attempts,
                GameResult::InProgress.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn append_attempt(&self, game_id: i64, attempt: &Attempt) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let current: Option<u32> = tx
            .query_row(
                "SELECT attempts_count FROM games WHERE id = ?",
                params![game_id],
                |row| row.get(0),
            )
            .optional()?;

        let current = current.ok_or(GameError::NotFound(game_id))?;

        // No last-writer-wins on attempt-number collision
        if attempt.attempt_number != current + 1 {
            return Err(GameError::Store(format!(
                "attempt {} for game {} is out of order (expected {})",
                attempt.attempt_number,
                game_id,
                current + 1
            )));
        }

        tx.execute(
            "INSERT INTO attempts (game_id, attempt_number, guessed_value, outcome)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                game_id,
                attempt.attempt_number,
                attempt.guessed_value,
                attempt.outcome.as_str(),
            ],
        )?;

        tx.execute(
            "UPDATE games SET attempts_count = ?1 WHERE id = ?2",
            params![attempt.attempt_number, game_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    async fn complete_game(
        &self,
        game_id: i64,
        result: GameResult,
        attempts_count: u32,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let existing: Option<(String, u32)> = conn
            .query_row(
                "SELECT result, attempts_count FROM games WHERE id = ?",
                params![game_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (existing_result, existing_count) =
            existing.ok_or(GameError::NotFound(game_id))?;

        if existing_result != GameResult::InProgress.as_str() {
            // Re-completion is a no-op only when nothing changes
            if existing_result == result.as_str() && existing_count == attempts_count {
                return Ok(());
            }
            return Err(GameError::Store(format!(
                "game {} is already completed as {}",
                game_id, existing_result
            )));
        }

        conn.execute(
            "UPDATE games SET result = ?1, attempts_count = ?2, completed_at = ?3
             WHERE id = ?4",
            params![
                result.as_str(),
                attempts_count,
                Utc::now().to_rfc3339(),
                game_id,
            ],
        )?;

        Ok(())
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>> {
        self.list_where("")
    }

    async fn list_won(&self) -> Result<Vec<GameRecord>> {
        self.list_where("WHERE result = 'won'")
    }

    async fn list_lost(&self) -> Result<Vec<GameRecord>> {
        self.list_where("WHERE result = 'lost'")
    }

    async fn get_game(&self, game_id: i64) -> Result<Option<GameRecord>> {
        let conn = self.conn.lock().unwrap();

        let game = conn
            .query_row(
                "SELECT id, player_name, max_number, secret_number, max_attempts,
                        attempts_count, result, started_at, completed_at
                 FROM games WHERE id = ?",
                params![game_id],
                Self::row_to_game,
            )
            .optional()?;

        Ok(game)
    }

    async fn get_attempts(&self, game_id: i64) -> Result<Vec<Attempt>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT attempt_number, guessed_value, outcome
             FROM attempts WHERE game_id = ? ORDER BY attempt_number",
        )?;

        let attempts = stmt
            .query_map(params![game_id], |row| {
                let outcome_str: String = row.get(2)?;
                let outcome = Outcome::from_str(&outcome_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        format!("unknown outcome: {}", outcome_str).into(),
                    )
                })?;

                Ok(Attempt {
                    attempt_number: row.get(0)?,
                    guessed_value: row.get(1)?,
                    outcome,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(attempts)
    }

    async fn player_stats(&self) -> Result<Vec<PlayerStats>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT player_name,
                    COUNT(*) AS total_games,
                    SUM(CASE WHEN result = 'won' THEN 1 ELSE 0 END) AS wins,
                    SUM(CASE WHEN result = 'lost' THEN 1 ELSE 0 END) AS losses,
                    AVG(CASE WHEN result = 'won' THEN attempts_count END) AS avg_attempts,
                    MIN(CASE WHEN result = 'won' THEN attempts_count END) AS min_attempts,
                    MAX(CASE WHEN result = 'won' THEN attempts_count END) AS max_attempts
             FROM games
             WHERE result != 'in_progress'
             GROUP BY player_name
             ORDER BY wins DESC, total_games DESC, player_name",
        )?;

        let stats = stmt
            .query_map([], |row| {
                let total_games: u32 = row.get(1)?;
                let wins: u32 = row.get(2)?;
                let avg: Option<f64> = row.get(4)?;

                let win_rate = if total_games > 0 {
                    round_to(wins as f64 / total_games as f64 * 100.0, 1)
                } else {
                    0.0
                };

                Ok(PlayerStats {
                    player_name: row.get(0)?,
                    total_games,
                    wins,
                    losses: row.get(3)?,
                    win_rate,
                    avg_attempts_to_win: avg.map(|a| round_to(a, 2)),
                    min_attempts_to_win: row.get(5)?,
                    max_attempts_to_win: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(stats)
    }
}
