//! Cell values.
//!
//! A cell is either outside the playable outline, empty, or holds the
//! signed number a player placed on it.

/// The content of a single board location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Not part of the playable board.
    Blocked,
    /// Playable and not yet taken.
    Empty,
    /// A placed number: positive for Player 1, negative for Player 2.
    Played(i32),
}

impl Cell {
    /// Builds a cell from a layout marker (`None` is blocked, `0` is empty).
    pub const fn from_marker(marker: Option<i32>) -> Cell {
        match marker {
            None => Cell::Blocked,
            Some(0) => Cell::Empty,
            Some(v) => Cell::Played(v),
        }
    }

    /// Returns the layout marker for this cell.
    pub const fn marker(self) -> Option<i32> {
        match self {
            Cell::Blocked => None,
            Cell::Empty => Some(0),
            Cell::Played(v) => Some(v),
        }
    }

    /// Signed value of the cell; blocked and empty cells count as 0.
    pub const fn value(self) -> i32 {
        match self {
            Cell::Played(v) => v,
            _ => 0,
        }
    }

    pub const fn is_blocked(self) -> bool {
        matches!(self, Cell::Blocked)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub const fn is_played(self) -> bool {
        matches!(self, Cell::Played(_))
    }
}
