//! User-tunable session settings.
//!
//! # Invariants
//! - `session_seconds` is within `1..=MAX_SESSION_SECONDS`.
//! - `daily_goal` is at least 1.
//! - Invalid input is coerced to defaults, never rejected.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_SECONDS: u32 = 60;
pub const DEFAULT_DAILY_GOAL: u32 = 10;
pub const MAX_SESSION_SECONDS: u32 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Countdown length of one session, in seconds.
    pub session_seconds: u32,
    /// Memos per day needed to mark the day complete.
    pub daily_goal: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_seconds: DEFAULT_SESSION_SECONDS,
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

impl Settings {
    /// Returns settings with out-of-range values replaced.
    pub fn coerce(self) -> Self {
        let session_seconds = match self.session_seconds {
            0 => DEFAULT_SESSION_SECONDS,
            value => value.min(MAX_SESSION_SECONDS),
        };
        let daily_goal = match self.daily_goal {
            0 => DEFAULT_DAILY_GOAL,
            value => value,
        };
        Self {
            session_seconds,
            daily_goal,
        }
    }

    /// Parses raw form input, falling back to defaults per field.
    pub fn from_raw(session_seconds: &str, daily_goal: &str) -> Self {
        Self {
            session_seconds: session_seconds
                .trim()
                .parse()
                .unwrap_or(DEFAULT_SESSION_SECONDS),
            daily_goal: daily_goal.trim().parse().unwrap_or(DEFAULT_DAILY_GOAL),
        }
        .coerce()
    }
}
