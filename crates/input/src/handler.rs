//! Debounced input handler with a delayed draw.
//!
//! Terminals auto-repeat held keys and players double-tap, so accepted
//! actions must be at least `debounce_ms` apart. A draw request is not
//! applied immediately: it is scheduled `draw_delay_ms` later (the reveal
//! delay) and at most one draw can be pending, so draw order never drifts.
//!
//! Time is passed in by the caller (milliseconds, any monotonic origin).

use crate::types::{GameAction, DEFAULT_DEBOUNCE_MS, DEFAULT_DRAW_DELAY_MS};

#[derive(Debug, Clone)]
pub struct InputHandler {
    debounce_ms: u64,
    draw_delay_ms: u64,
    last_accepted_ms: Option<u64>,
    pending_draw_at_ms: Option<u64>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DEBOUNCE_MS, DEFAULT_DRAW_DELAY_MS)
    }

    pub fn with_config(debounce_ms: u64, draw_delay_ms: u64) -> Self {
        Self {
            debounce_ms,
            draw_delay_ms,
            last_accepted_ms: None,
            pending_draw_at_ms: None,
        }
    }

    pub fn draw_pending(&self) -> bool {
        self.pending_draw_at_ms.is_some()
    }

    /// Feed a (phase-resolved) action pressed at `now_ms`.
    ///
    /// Returns the action to apply immediately, if any. Draws are only
    /// scheduled here and come out of [`InputHandler::update`].
    pub fn handle_action(&mut self, action: GameAction, now_ms: u64) -> Option<GameAction> {
        if let Some(last) = self.last_accepted_ms {
            if now_ms.saturating_sub(last) < self.debounce_ms {
                log::debug!("debounced {}", action.as_str());
                return None;
            }
        }

        match action {
            GameAction::Draw | GameAction::Primary => {
                if self.pending_draw_at_ms.is_some() {
                    return None;
                }
                self.last_accepted_ms = Some(now_ms);
                self.pending_draw_at_ms = Some(now_ms + self.draw_delay_ms);
                None
            }
            GameAction::Deal => {
                self.last_accepted_ms = Some(now_ms);
                Some(GameAction::Deal)
            }
        }
    }

    /// Release a scheduled draw once its delay has elapsed.
    pub fn update(&mut self, now_ms: u64) -> Option<GameAction> {
        match self.pending_draw_at_ms {
            Some(due) if now_ms >= due => {
                self.pending_draw_at_ms = None;
                Some(GameAction::Draw)
            }
            _ => None,
        }
    }

    /// Drop a scheduled draw (e.g. the session ended meanwhile).
    pub fn cancel_pending(&mut self) {
        self.pending_draw_at_ms = None;
    }

    /// Time until the scheduled draw is due, if one is pending.
    pub fn pending_due_in(&self, now_ms: u64) -> Option<u64> {
        self.pending_draw_at_ms.map(|due| due.saturating_sub(now_ms))
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
