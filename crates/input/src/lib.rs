//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`] and keeps the hex
//! cursor that turns two selections into a swap request.

pub mod cursor;
pub mod map;

pub use hexmatch_types as types;

pub use cursor::{CursorOutcome, HexCursor};
pub use map::{handle_key_event, should_quit};
