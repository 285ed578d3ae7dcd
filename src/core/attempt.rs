use serde::{Deserialize, Serialize};

/// Result of comparing one guess against the secret.
///
/// `Higher` means the secret is higher than the guess, `Lower` that it is
/// lower. The player-facing hint follows the same convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Lower,
    Higher,
    Exact,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Lower => "lower",
            Outcome::Higher => "higher",
            Outcome::Exact => "exact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lower" => Some(Outcome::Lower),
            "higher" => Some(Outcome::Higher),
            "exact" => Some(Outcome::Exact),
            _ => None,
        }
    }
}

/// Compare a guess against the secret.
///
/// Pure and total over integers. Range validation happens before this is
/// called and does not consume an attempt.
pub fn evaluate(secret: i64, guess: i64) -> Outcome {
    if guess == secret {
        Outcome::Exact
    } else if secret > guess {
        Outcome::Higher
    } else {
        Outcome::Lower
    }
}

/// One validated guess and its outcome within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// 1-based, strictly increasing per session
    pub attempt_number: u32,
    pub guessed_value: i64,
    pub outcome: Outcome,
}

/// Ordered, append-only sequence of attempts for one session.
///
/// Invariant: the k-th element carries `attempt_number == k`.
#[derive(Debug, Clone, Default)]
pub struct AttemptLog {
    attempts: Vec<Attempt>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a guess, assigning the next attempt number
    pub fn record(&mut self, guessed_value: i64, outcome: Outcome) -> Attempt {
        let attempt = Attempt {
            attempt_number: self.attempts.len() as u32 + 1,
            guessed_value,
            outcome,
        };
        self.attempts.push(attempt.clone());
        attempt
    }

    pub fn len(&self) -> u32 {
        self.attempts.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}
