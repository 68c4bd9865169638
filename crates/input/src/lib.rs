//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and provides an input handler
//! that debounces player actions and applies the presentation draw delay.

pub mod handler;
pub mod map;

pub use garden_bingo_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
