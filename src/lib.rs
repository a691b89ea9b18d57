//! Hex match (workspace facade crate).
//!
//! Re-exports the member crates under short names so the binary, the
//! integration tests and the benches all go through one path:
//! `hexmatch::{core, input, term, types}`. The binary's argument parsing and
//! headless autoplay live here too, so they can be tested without a terminal.

pub mod autoplay;
pub mod cli;

pub use hexmatch_core as core;
pub use hexmatch_input as input;
pub use hexmatch_term as term;
pub use hexmatch_types as types;
