use thiserror::Error;

/// Main error type for the game engine
#[derive(Error, Debug)]
pub enum GameError {
    /// Session parameters that cannot produce a playable game
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Guess outside [1, max_number]; does not consume an attempt
    #[error("Guess {guess} is out of range 1..={max_number}")]
    InvalidGuess { guess: i64, max_number: i64 },

    /// Guess submitted after the session reached Won or Lost
    #[error("Session is already finished")]
    SessionClosed,

    /// Unknown game id
    #[error("Game {0} not found")]
    NotFound(i64),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Store contract violations (attempt ordering, conflicting completion)
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GameError>;
