//! Error taxonomy for the engine boundary.
//!
//! Every variant is recoverable: the state machine rejects the action and
//! leaves its state untouched. Corrupt persisted values never surface here;
//! they are normalized where they are read.

use std::time::Duration;

use thiserror::Error;

use crate::types::Phase;

/// Errors returned by game operations.
#[derive(Error, Debug)]
pub enum GameError {
    /// A draw was requested with no undrawn items left.
    #[error("draw pool exhausted")]
    PoolExhausted,

    /// A draw was requested after the session's draw cap.
    #[error("draw cap of {max_draws} reached")]
    CapReached { max_draws: u32 },

    /// A deal was requested with zero tickets remaining.
    #[error("no tickets available; next refill in {}s", .resets_in.as_secs())]
    NoTicketsAvailable { resets_in: Duration },

    /// An action was invoked in a phase that forbids it.
    #[error("cannot {action} while {phase}")]
    InvalidState { action: &'static str, phase: Phase },

    /// The persistence backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    /// Expected, user-facing conditions (as opposed to contract violations).
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            GameError::NoTicketsAvailable { .. } | GameError::CapReached { .. }
        )
    }
}

/// Errors from a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration validation and loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(&'static str),

    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let err = GameError::NoTicketsAvailable {
            resets_in: Duration::from_secs(90),
        };
        assert_eq!(err.to_string(), "no tickets available; next refill in 90s");

        let err = GameError::InvalidState {
            action: "draw",
            phase: Phase::Idle,
        };
        assert_eq!(err.to_string(), "cannot draw while idle");
    }

    #[test]
    fn expected_errors() {
        assert!(GameError::CapReached { max_draws: 45 }.is_expected());
        assert!(!GameError::PoolExhausted.is_expected());
    }
}
