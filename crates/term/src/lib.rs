//! Terminal board renderer.
//!
//! A small, game-oriented rendering layer for the hex board. It avoids widget
//! and layout libraries and renders into a plain framebuffer that is diffed and
//! flushed through crossterm.
//!
//! Goals:
//! - Keep `core` free of terminal concerns
//! - Draw only from [`core::BoardSnapshot`], never from the live board
//! - Keep the view pure so layout can be unit-tested

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use hexmatch_core as core;
pub use hexmatch_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{kind_color, BoardLayout, BoardView, ViewMarks, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
