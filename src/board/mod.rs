//! Board representation and game-state types.
//!
//! Contains cells, the row-major grid, the hex neighbor relation, board
//! layouts and the two position representations.

pub mod adjacency;
pub mod cell;
pub mod endgame;
pub mod grid;
pub mod layout;
pub mod state;

pub use adjacency::{adjacent_cells, neighbors, row_parity_for};
pub use cell::Cell;
pub use endgame::{ConversionError, EndgamePosition};
pub use grid::Grid;
pub use layout::{
    load_layouts, parse_layouts, preset_specs, presets, random_layout, BoardLayout, LayoutError,
    LayoutSpec,
};
pub use state::{next_value_for, HexState, MoveError, Position, Winner};
