//! Allowance module - the daily ticket budget
//!
//! The allowance is refilled to the daily grant at most once per rolling
//! window, measured from the last refill. Every operation re-reads the store,
//! so the persisted pair is the single source of truth. Missing or corrupt
//! values are treated as "never refilled" and trigger a refill instead of an
//! error.

use std::time::Duration;

use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{GameError, StoreError};
use crate::store::{KeyValueStore, KEY_LAST_RESET, KEY_TICKETS};

/// The persisted ticket budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allowance {
    pub tickets_remaining: u32,
    /// Epoch ms of the last refill.
    pub last_reset_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceClock {
    daily_grant: u32,
    window_ms: u64,
}

impl AllowanceClock {
    pub fn new(daily_grant: u32, window_ms: u64) -> Self {
        Self {
            daily_grant,
            window_ms,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.daily_grant, config.reset_window_ms)
    }

    /// Read the stored allowance. `None` if either value is missing or does
    /// not parse.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S) -> Option<Allowance> {
        let tickets = store.get(KEY_TICKETS)?.trim().parse::<u32>().ok()?;
        let last_reset_ms = store.get(KEY_LAST_RESET)?.trim().parse::<u64>().ok()?;
        Some(Allowance {
            tickets_remaining: tickets,
            last_reset_ms,
        })
    }

    /// Whether `stored` must be replaced by a fresh grant at `now_ms`.
    ///
    /// A reset instant in the future is as untrustworthy as a missing one.
    pub fn needs_refill(&self, stored: Option<Allowance>, now_ms: u64) -> bool {
        match stored {
            None => true,
            Some(a) if a.last_reset_ms > now_ms => true,
            Some(a) => now_ms - a.last_reset_ms >= self.window_ms,
        }
    }

    /// Refill the allowance if the window has elapsed (or the stored values
    /// are unusable), persisting the result.
    pub fn check_and_refill<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        now_ms: u64,
    ) -> Result<Allowance, StoreError> {
        let stored = self.load(store);
        if let Some(a) = stored {
            if !self.needs_refill(stored, now_ms) {
                return Ok(a);
            }
        }

        let present = store.get(KEY_TICKETS).is_some() || store.get(KEY_LAST_RESET).is_some();
        if stored.is_none() && present {
            log::warn!("allowance data unreadable; granting a fresh allowance");
        }

        let fresh = Allowance {
            tickets_remaining: self.daily_grant,
            last_reset_ms: now_ms,
        };
        store.set_many(&[
            (KEY_TICKETS, fresh.tickets_remaining.to_string()),
            (KEY_LAST_RESET, fresh.last_reset_ms.to_string()),
        ])?;
        log::info!("allowance refilled to {} tickets", fresh.tickets_remaining);
        Ok(fresh)
    }

    /// Spend one ticket.
    pub fn consume_one<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        now_ms: u64,
    ) -> Result<Allowance, GameError> {
        let current = self.check_and_refill(store, now_ms)?;
        let next = self.spend(current, now_ms)?;
        store.set(KEY_TICKETS, next.tickets_remaining.to_string())?;
        Ok(next)
    }

    /// The allowance after spending one ticket, without persisting it.
    ///
    /// Callers that write other keys in the same mutation persist
    /// `tickets_remaining` themselves.
    pub fn spend(&self, current: Allowance, now_ms: u64) -> Result<Allowance, GameError> {
        if current.tickets_remaining == 0 {
            return Err(GameError::NoTicketsAvailable {
                resets_in: self.time_until_next_reset(&current, now_ms),
            });
        }
        Ok(Allowance {
            tickets_remaining: current.tickets_remaining - 1,
            ..current
        })
    }

    /// `max(0, window - (now - last_reset))`.
    pub fn time_until_next_reset(&self, allowance: &Allowance, now_ms: u64) -> Duration {
        let elapsed = now_ms.saturating_sub(allowance.last_reset_ms);
        Duration::from_millis(self.window_ms.saturating_sub(elapsed))
    }
}
