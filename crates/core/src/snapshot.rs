//! Snapshot module - a read-only copy of the game for the presentation layer
//!
//! Built by [`GameStateMachine::snapshot`](crate::GameStateMachine::snapshot);
//! the view renders from it without borrowing the machine.

use serde::Serialize;

use crate::types::{Cell, Item, Outcome, Phase, CELL_COUNT};
use crate::win::{CellMask, TierFlags};

/// Read-only view of the game for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub ticket: Option<[Cell; CELL_COUNT]>,
    pub marked_mask: CellMask,
    pub winning_mask: CellMask,
    pub won_lines: u8,
    pub drawn: Vec<Item>,
    pub last_drawn: Option<Item>,
    /// Ticket slot of `last_drawn`, if it was on the ticket.
    pub last_marked: Option<usize>,
    pub draw_count: u32,
    pub max_draws: u32,
    pub tiers: TierFlags,
    pub outcome: Option<Outcome>,
    pub tickets_remaining: u32,
    pub next_reset_ms: u64,
    pub cooldown_ms: u64,
}

impl GameSnapshot {
    pub fn is_marked(&self, index: usize) -> bool {
        index < CELL_COUNT && self.marked_mask & (1 << index) != 0
    }

    pub fn is_winning(&self, index: usize) -> bool {
        index < CELL_COUNT && self.winning_mask & (1 << index) != 0
    }

    pub fn draws_left(&self) -> u32 {
        self.max_draws.saturating_sub(self.draw_count)
    }

    pub fn can_deal(&self) -> bool {
        self.phase == Phase::Idle && self.tickets_remaining > 0
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            ticket: None,
            marked_mask: 0,
            winning_mask: 0,
            won_lines: 0,
            drawn: Vec::new(),
            last_drawn: None,
            last_marked: None,
            draw_count: 0,
            max_draws: 0,
            tiers: TierFlags::default(),
            outcome: None,
            tickets_remaining: 0,
            next_reset_ms: 0,
            cooldown_ms: 0,
        }
    }
}
