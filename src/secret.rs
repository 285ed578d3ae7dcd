use rand::Rng;

use crate::error::{GameError, Result};

/// Source of the secret number drawn once per session.
///
/// Implementations must not be predictable by the player from observable
/// program state; `FixedSecret` exists for tests and scripted play-throughs.
pub trait SecretSource: Send + Sync {
    /// Draw a secret uniformly from `[1, max_number]`
    fn draw(&self, max_number: i64) -> Result<i64>;
}

/// Thread-local RNG backed secret source
pub struct RandomSecret;

impl RandomSecret {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomSecret {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for RandomSecret {
    fn draw(&self, max_number: i64) -> Result<i64> {
        if max_number < 1 {
            return Err(GameError::InvalidConfiguration(format!(
                "max_number must be at least 1, got {}",
                max_number
            )));
        }
        Ok(rand::rng().random_range(1..=max_number))
    }
}

/// Always returns the same secret
pub struct FixedSecret(pub i64);

impl SecretSource for FixedSecret {
    fn draw(&self, max_number: i64) -> Result<i64> {
        if max_number < 1 {
            return Err(GameError::InvalidConfiguration(format!(
                "max_number must be at least 1, got {}",
                max_number
            )));
        }
        Ok(self.0)
    }
}
