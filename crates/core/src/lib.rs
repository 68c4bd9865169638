//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the bingo rules, session state and allowance logic.
//! Randomness, time and persistence are injected, making the engine:
//!
//! - **Deterministic**: Same seed and clock produce identical sessions
//! - **Testable**: Unit tests for every rule, scenario tests for the lifecycle
//! - **Portable**: No UI dependency; the presentation layer consumes events
//!
//! # Module Structure
//!
//! - [`allowance`]: Daily ticket budget with a rolling 24h refill
//! - [`clock`]: Wall-clock abstraction and a manual clock for tests
//! - [`config`]: Tunables (draw cap, jackpot threshold, cooldown, ...)
//! - [`draw`]: Draws without replacement with a per-session cap
//! - [`event`]: Outbound events for the presentation layer
//! - [`game_state`]: The session state machine
//! - [`rng`]: Injectable random sources
//! - [`snapshot`]: Read-only view for rendering
//! - [`store`]: Key-value persistence (memory and JSON file)
//! - [`ticket`]: 5x5 ticket generation
//! - [`win`]: Line detection and the win ladder
//!
//! # Game Rules
//!
//! - **Ticket**: 24 distinct items from a 51-item catalog, free centre cell
//! - **Draws**: one catalog item at a time, never repeated, capped per session
//! - **Ladder**: one line, two lines, full house, jackpot (an early full house)
//! - **Allowance**: a deal costs one ticket; tickets refill once per 24h window
//!
//! # Example
//!
//! ```
//! use garden_bingo_core::{GameConfig, GameStateMachine, ManualClock, MemoryStore, SimpleRng};
//! use garden_bingo_types::Phase;
//!
//! let clock = ManualClock::new(1_700_000_000_000);
//! let mut game = GameStateMachine::new(
//!     GameConfig::default(),
//!     MemoryStore::new(),
//!     clock,
//!     SimpleRng::new(12345),
//! )
//! .unwrap();
//!
//! game.deal().unwrap();
//! while game.phase() != Phase::SessionEnded {
//!     game.draw_next().unwrap();
//! }
//! assert!(game.outcome().is_some());
//! assert_eq!(game.allowance().tickets_remaining, 9);
//! ```

pub mod allowance;
pub mod clock;
pub mod config;
pub mod draw;
pub mod error;
pub mod event;
pub mod game_state;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod ticket;
pub mod win;

pub use garden_bingo_types as types;

// Re-export commonly used types for convenience
pub use allowance::{Allowance, AllowanceClock};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GameConfig;
pub use draw::DrawEngine;
pub use error::{ConfigError, GameError, StoreError};
pub use event::GameEvent;
pub use game_state::GameStateMachine;
pub use rng::{RandomSource, SimpleRng};
pub use snapshot::GameSnapshot;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use ticket::{generate_ticket, Ticket};
pub use win::{Evaluation, TierFlags, WinEvaluator, LINES};
