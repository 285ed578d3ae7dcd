use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{evaluate, Attempt, AttemptLog, GameConfig, GameResult, Outcome};
use crate::error::{GameError, Result};
use crate::secret::SecretSource;
use crate::store::GameStore;

/// Session lifecycle: `Created` until the first accepted guess, then
/// `InProgress` until a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Created,
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Won | SessionState::Lost)
    }
}

/// What the player learns from one accepted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessFeedback {
    pub outcome: Outcome,
    pub attempt_number: u32,
    pub remaining_attempts: u32,
    pub state: SessionState,
    /// Revealed only once the session is terminal
    pub secret: Option<i64>,
}

/// One play-through from secret generation to terminal outcome.
///
/// Owns the config, the secret, and the in-memory attempt log; every accepted
/// attempt and the final outcome are forwarded to the injected [`GameStore`]
/// before the next guess is accepted. The game record is created eagerly at
/// session start, so an abandoned session is visible as `InProgress`.
pub struct GameSession {
    config: GameConfig,
    secret: i64,
    log: AttemptLog,
    state: SessionState,
    store: Arc<dyn GameStore>,
    game_id: i64,
}

impl GameSession {
    /// Draw a secret, persist the new game record, and return the session
    pub async fn start(
        config: GameConfig,
        secrets: &dyn SecretSource,
        store: Arc<dyn GameStore>,
    ) -> Result<Self> {
        let secret = secrets.draw(config.max_number)?;
        let game_id = store.create_game(&config, secret).await?;

        tracing::info!(
            game_id,
            player = %config.player_name,
            max_number = config.max_number,
            max_attempts = config.max_attempts,
            "session started"
        );

        Ok(Self {
            config,
            secret,
            log: AttemptLog::new(),
            state: SessionState::Created,
            store,
            game_id,
        })
    }

    /// Process one guess.
    ///
    /// Out-of-range guesses fail with `InvalidGuess` without consuming an
    /// attempt; guesses after a terminal state fail with `SessionClosed`.
    pub async fn guess(&mut self, guess: i64) -> Result<GuessFeedback> {
        if self.state.is_terminal() {
            return Err(GameError::SessionClosed);
        }

        if guess < 1 || guess > self.config.max_number {
            return Err(GameError::InvalidGuess {
                guess,
                max_number: self.config.max_number,
            });
        }

        self.state = SessionState::InProgress;

        let outcome = evaluate(self.secret, guess);
        let attempt = self.log.record(guess, outcome);
        self.store.append_attempt(self.game_id, &attempt).await?;

        tracing::debug!(
            game_id = self.game_id,
            attempt = attempt.attempt_number,
            guess,
            outcome = outcome.as_str(),
            "attempt recorded"
        );

        if outcome == Outcome::Exact {
            self.finalize(GameResult::Won).await?;
        } else if self.log.len() == self.config.max_attempts {
            self.finalize(GameResult::Lost).await?;
        }

        Ok(GuessFeedback {
            outcome,
            attempt_number: attempt.attempt_number,
            remaining_attempts: self.remaining_attempts(),
            state: self.state,
            secret: self.state.is_terminal().then_some(self.secret),
        })
    }

    async fn finalize(&mut self, result: GameResult) -> Result<()> {
        self.state = match result {
            GameResult::Won => SessionState::Won,
            GameResult::Lost => SessionState::Lost,
            GameResult::InProgress => return Ok(()),
        };

        self.store
            .complete_game(self.game_id, result, self.log.len())
            .await?;

        tracing::info!(
            game_id = self.game_id,
            result = result.as_str(),
            attempts = self.log.len(),
            "session finished"
        );

        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game_id(&self) -> i64 {
        self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn attempts(&self) -> &[Attempt] {
        self.log.attempts()
    }

    pub fn attempts_count(&self) -> u32 {
        self.log.len()
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.config.max_attempts - self.log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::FixedSecret;
    use crate::store::MemoryStore;

    async fn session(secret: i64, max_number: i64, max_attempts: u32) -> GameSession {
        let store = Arc::new(MemoryStore::new());
        GameSession::start(
            GameConfig::new("Ann", max_number, max_attempts),
            &FixedSecret(secret),
            store,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_session_starts_created() {
        let session = session(7, 10, 3).await;
        assert_eq!(session.state(), SessionState::Created);
        assert_eq!(session.remaining_attempts(), 3);
        assert!(session.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_win_on_third_guess_logs_exactly_three() {
        let mut session = session(7, 10, 5).await;

        assert_eq!(session.guess(3).await.unwrap().outcome, Outcome::Higher);
        assert_eq!(session.guess(9).await.unwrap().outcome, Outcome::Lower);

        let feedback = session.guess(7).await.unwrap();
        assert_eq!(feedback.outcome, Outcome::Exact);
        assert_eq!(feedback.attempt_number, 3);
        assert_eq!(feedback.state, SessionState::Won);
        assert_eq!(feedback.secret, Some(7));

        assert_eq!(session.attempts_count(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_loses_on_fifth_guess() {
        let mut session = session(7, 10, 5).await;

        for _ in 0..4 {
            let feedback = session.guess(1).await.unwrap();
            assert_eq!(feedback.state, SessionState::InProgress);
            assert_eq!(feedback.secret, None);
        }

        let feedback = session.guess(1).await.unwrap();
        assert_eq!(feedback.state, SessionState::Lost);
        assert_eq!(feedback.remaining_attempts, 0);
        assert_eq!(feedback.secret, Some(7));
        assert_eq!(session.attempts_count(), 5);
    }

    #[tokio::test]
    async fn test_out_of_range_guess_costs_nothing() {
        let mut session = session(7, 10, 3).await;

        for bad in [0, -5, 11, 100] {
            let err = session.guess(bad).await.unwrap_err();
            assert!(matches!(err, GameError::InvalidGuess { .. }));
        }

        assert_eq!(session.attempts_count(), 0);
        assert_eq!(session.remaining_attempts(), 3);
        assert_eq!(session.state(), SessionState::Created);
    }

    #[tokio::test]
    async fn test_terminal_session_rejects_guesses() {
        let mut session = session(7, 10, 3).await;
        session.guess(7).await.unwrap();

        let err = session.guess(5).await.unwrap_err();
        assert!(matches!(err, GameError::SessionClosed));
        assert_eq!(session.attempts_count(), 1);
    }

    #[tokio::test]
    async fn test_remaining_attempts_counts_down() {
        let mut session = session(7, 10, 3).await;

        assert_eq!(session.guess(1).await.unwrap().remaining_attempts, 2);
        assert_eq!(session.guess(2).await.unwrap().remaining_attempts, 1);
    }

    #[tokio::test]
    async fn test_session_persists_record_eagerly() {
        let store = Arc::new(MemoryStore::new());
        let session = GameSession::start(
            GameConfig::new("Ann", 10, 3),
            &FixedSecret(7),
            store.clone(),
        )
        .await
        .unwrap();

        // Abandoned session is already visible as in-progress
        let games = store.list_games().await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, session.game_id());
        assert_eq!(games[0].result, GameResult::InProgress);
    }
}
