//! Line protocol handling.
//!
//! The command parser for the main loop and the text rendering of boards
//! and hint overlays.

pub mod format;
pub mod parser;

pub use format::{format_board, format_cell_eval, format_hints, format_row};
pub use parser::{parse_command, Command, GameSource};
