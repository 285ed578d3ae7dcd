//! # Guess-Number Game Engine
//!
//! Number-guessing game engine with:
//! - Session state machine (secret, attempt budget, win/loss)
//! - Pluggable persistence (SQLite, in-memory)
//! - Browse queries: listings, single-game replay, per-player statistics
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use guess_number::{GameConfig, GameSession, RandomSecret, SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(SqliteStore::new("games.db").await?);
//!     let config = GameConfig::new("Ann", 100, 10);
//!
//!     let mut session = GameSession::start(config, &RandomSecret::new(), store).await?;
//!
//!     let feedback = session.guess(50).await?;
//!     println!("{:?}, {} attempts left", feedback.outcome, feedback.remaining_attempts);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod secret;
pub mod session;
pub mod stats;
pub mod store;

// Re-export primary types
pub use crate::core::{evaluate, Attempt, AttemptLog, GameConfig, GameRecord, GameResult,
                      Outcome, PlayerStats};
pub use error::{GameError, Result};
pub use secret::{FixedSecret, RandomSecret, SecretSource};
pub use session::{GameSession, GuessFeedback, SessionState};
pub use store::{GameStore, MemoryStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
