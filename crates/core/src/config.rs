//! Game configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    CATALOG_SIZE, DEFAULT_COOLDOWN_MS, DEFAULT_DAILY_GRANT, DEFAULT_DEBOUNCE_MS,
    DEFAULT_DRAW_DELAY_MS, DEFAULT_JACKPOT_THRESHOLD, DEFAULT_MAX_DRAWS, RESET_WINDOW_MS,
    TICKET_ITEMS,
};

/// Tunables for one game installation.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Draw cap per session
    pub max_draws: u32,
    /// A full house at or before this draw count is a jackpot
    pub jackpot_threshold: u32,
    /// Tickets granted per refill
    pub daily_grant: u32,
    /// Rolling refill window
    pub reset_window_ms: u64,
    /// Delay between session end and the next deal
    pub cooldown_ms: u64,
    /// Presentation delay before a requested draw applies
    pub draw_delay_ms: u64,
    /// Minimum spacing between user actions
    pub debounce_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_draws: DEFAULT_MAX_DRAWS,
            jackpot_threshold: DEFAULT_JACKPOT_THRESHOLD,
            daily_grant: DEFAULT_DAILY_GRANT,
            reset_window_ms: RESET_WINDOW_MS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            draw_delay_ms: DEFAULT_DRAW_DELAY_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_draws == 0 {
            return Err(ConfigError::Invalid("max_draws must be at least 1"));
        }
        if self.max_draws as usize > CATALOG_SIZE {
            return Err(ConfigError::Invalid("max_draws exceeds the catalog size"));
        }
        if self.jackpot_threshold > self.max_draws {
            return Err(ConfigError::Invalid("jackpot_threshold exceeds max_draws"));
        }
        if self.daily_grant == 0 {
            return Err(ConfigError::Invalid("daily_grant must be at least 1"));
        }
        if self.reset_window_ms == 0 {
            return Err(ConfigError::Invalid("reset_window_ms must be non-zero"));
        }
        if (self.jackpot_threshold as usize) < TICKET_ITEMS {
            log::warn!(
                "jackpot_threshold {} is below {} draws; the jackpot is unreachable",
                self.jackpot_threshold,
                TICKET_ITEMS
            );
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_draws, 45);
        assert_eq!(config.jackpot_threshold, 35);
        assert_eq!(config.daily_grant, 10);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "max_draws": 41, "jackpot_threshold": 31 }"#)
            .unwrap();
        assert_eq!(config.max_draws, 41);
        assert_eq!(config.jackpot_threshold, 31);
        assert_eq!(config.cooldown_ms, DEFAULT_COOLDOWN_MS);
    }

    #[test]
    fn rejects_cap_beyond_catalog() {
        let err = GameConfig::from_json_str(r#"{ "max_draws": 52 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_threshold_beyond_cap() {
        let config = GameConfig {
            max_draws: 30,
            jackpot_threshold: 31,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_grant_and_window() {
        let zero_grant = GameConfig {
            daily_grant: 0,
            ..GameConfig::default()
        };
        assert!(zero_grant.validate().is_err());

        let zero_window = GameConfig {
            reset_window_ms: 0,
            ..GameConfig::default()
        };
        assert!(zero_window.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ max_draws"),
            Err(ConfigError::Parse(_))
        ));
    }
}
