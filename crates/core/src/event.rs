//! Outbound events for the presentation layer.

use std::time::Duration;

use serde::Serialize;

use crate::ticket::Ticket;
use crate::types::{Cell, Item, Outcome, WinTier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TicketDealt {
        #[serde(serialize_with = "serialize_cells")]
        ticket: Ticket,
    },
    ItemDrawn {
        item: Item,
        /// Ticket slot marked by this draw, if the item is on the ticket.
        marked_index: Option<usize>,
    },
    TierAchieved {
        tier: WinTier,
    },
    SessionEnded {
        outcome: Outcome,
    },
    AllowanceChanged {
        tickets_remaining: u32,
    },
    CountdownTick {
        #[serde(serialize_with = "serialize_ms")]
        remaining: Duration,
    },
    /// The post-session cooldown elapsed; a new deal is allowed.
    CooldownElapsed,
}

fn serialize_cells<S: serde::Serializer>(ticket: &Ticket, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(ticket.cells().iter().map(Cell::as_str))
}

fn serialize_ms<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
