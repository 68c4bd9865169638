//! Garden Bingo (workspace facade crate).
//!
//! Re-exports the member crates as `garden_bingo::{core,input,term,types}` and
//! hosts the command-line parsing used by the terminal binary.

pub mod cli;

pub use garden_bingo_core as core;
pub use garden_bingo_input as input;
pub use garden_bingo_term as term;
pub use garden_bingo_types as types;
