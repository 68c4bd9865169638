//! Terminal presentation module.
//!
//! A small text front-end for the engine: [`GameView`] turns a
//! [`core::GameSnapshot`] into styled lines (pure, unit-testable) and
//! [`TerminalRenderer`] flushes them to a real terminal.

pub mod game_view;
pub mod renderer;

pub use garden_bingo_core as core;
pub use garden_bingo_types as types;

pub use game_view::{format_countdown, GameView, Line, Span, Tone};
pub use renderer::{encode_lines_into, TerminalRenderer};
