pub mod attempt;
pub mod game_record;

pub use attempt::{evaluate, Attempt, AttemptLog, Outcome};
pub use game_record::{GameConfig, GameRecord, GameResult, PlayerStats};
