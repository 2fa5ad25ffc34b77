//! Game positions.
//!
//! A [`Position`] is an immutable snapshot: the board, the per-empty-cell
//! neighbor sums (`field_vals`), the aggregate `sum` and the move counters.
//! Applying a move produces a new position and updates the derived data
//! incrementally; only construction recomputes everything from the board.
//!
//! Coordinates passed to [`HexState::play`] count rows from the bottom,
//! while storage and iteration are top row first.

use super::adjacency::adjacent_cells;
use super::cell::Cell;
use super::grid::Grid;
use super::layout::BoardLayout;

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    /// Final sum below zero.
    PlayerOne,
    /// Final sum above zero.
    PlayerTwo,
    Draw,
}

impl Winner {
    /// Derives the winner from a final sum.
    pub const fn from_sum(sum: i32) -> Winner {
        if sum < 0 {
            Winner::PlayerOne
        } else if sum > 0 {
            Winner::PlayerTwo
        } else {
            Winner::Draw
        }
    }

    /// Numeric outcome: -1 for Player 1, 1 for Player 2, 0 for a draw.
    pub const fn score(self) -> i32 {
        match self {
            Winner::PlayerOne => -1,
            Winner::PlayerTwo => 1,
            Winner::Draw => 0,
        }
    }

    /// Inverse of [`Winner::score`] on its sign.
    pub const fn from_score(score: i32) -> Winner {
        Winner::from_sum(score)
    }

    /// Short protocol label.
    pub const fn label(self) -> &'static str {
        match self {
            Winner::PlayerOne => "p1",
            Winner::PlayerTwo => "p2",
            Winner::Draw => "draw",
        }
    }
}

/// Why a move was rejected. The position it was played on is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("all moves have been played")]
    MovesExhausted,

    #[error("({x}, {y}) is outside the board")]
    OutOfRange { x: i32, y: i32 },

    #[error("({x}, {y}) is not an empty cell")]
    Occupied { x: i32, y: i32 },
}

/// Operations shared by every position representation.
///
/// Search code is generic over this trait so it can run on either the
/// general [`Position`] or the cheaper single-hole variant.
pub trait HexState: Clone {
    fn board(&self) -> &Grid<Cell>;

    /// Neighbor sum of an empty cell; `None` for any other cell.
    fn field_val(&self, x: usize, row: usize) -> Option<i32>;

    fn sum(&self) -> i32;

    /// Moves allotted to each player.
    fn total_moves(&self) -> u32;

    /// Moves applied so far.
    fn current_move(&self) -> u32;

    fn name(&self) -> &str;

    /// Places the next number at `(x, y)`, `y` counted from the bottom row.
    fn play(&self, x: i32, y: i32) -> Result<Self, MoveError>;

    fn rows(&self) -> usize {
        self.board().rows()
    }

    fn cols(&self) -> usize {
        self.board().cols()
    }

    /// Returns true once both players have used all their moves.
    fn is_over(&self) -> bool {
        self.current_move() / 2 >= self.total_moves()
    }

    /// The winner, or `None` while moves remain. Depends only on `sum`.
    fn check_winner(&self) -> Option<Winner> {
        if self.is_over() {
            Some(Winner::from_sum(self.sum()))
        } else {
            None
        }
    }

    /// True when Player 1 is to move.
    fn player_one_to_move(&self) -> bool {
        self.current_move() % 2 == 0
    }

    /// Signed value the next move will place.
    fn next_value(&self) -> i32 {
        next_value_for(self.current_move())
    }

    /// Converts an internal row index into the bottom-first `y` of `play`.
    fn external_y(&self, row: usize) -> i32 {
        self.rows() as i32 - row as i32 - 1
    }

    /// Empty cells as `(x, row)`, top row first, left to right.
    fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.board()
            .iter()
            .filter(|(_, _, c)| c.is_empty())
            .map(|(x, r, _)| (x, r))
            .collect()
    }

    fn empty_count(&self) -> usize {
        self.board().iter().filter(|(_, _, c)| c.is_empty()).count()
    }

    fn playable_count(&self) -> usize {
        self.board().iter().filter(|(_, _, c)| !c.is_blocked()).count()
    }

    /// True when the board has room for exactly one cell to stay empty.
    fn is_single_hole(&self) -> bool {
        self.playable_count() == 2 * self.total_moves() as usize + 1
    }
}

/// Value placed on move number `current_move` (0-based).
pub const fn next_value_for(current_move: u32) -> i32 {
    let magnitude = 1 + (current_move / 2) as i32;
    if current_move % 2 == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Validates a move and converts `y` to an internal row.
pub(crate) fn check_move<S: HexState>(state: &S, x: i32, y: i32) -> Result<(usize, usize), MoveError> {
    if state.is_over() {
        return Err(MoveError::MovesExhausted);
    }
    let row = match (state.rows() as i32).checked_sub(y).and_then(|r| r.checked_sub(1)) {
        Some(row) if state.board().contains(x, row) => row,
        _ => return Err(MoveError::OutOfRange { x, y }),
    };
    let (x, row) = (x as usize, row as usize);
    if !state.board().get(x, row).is_empty() {
        return Err(MoveError::Occupied { x: x as i32, y });
    }
    Ok((x, row))
}

/// General position: valid for any layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    board: Grid<Cell>,
    field_vals: Grid<Option<i32>>,
    sum: i32,
    total_moves: u32,
    current_move: u32,
    name: String,
}

impl Position {
    /// Starts a game from a layout. Pre-played markers are honored, and the
    /// move counter is set to the number of played cells.
    pub fn new(layout: &BoardLayout) -> Self {
        Position::from_board(
            layout.board.clone(),
            layout.moves,
            layout.name.clone(),
        )
    }

    /// Builds a position from an arbitrary board, recomputing all derived data.
    pub fn from_board(board: Grid<Cell>, total_moves: u32, name: String) -> Self {
        let (field_vals, sum) = derive_field_vals(&board);
        let current_move = board.iter().filter(|(_, _, c)| c.is_played()).count() as u32;
        Position {
            board,
            field_vals,
            sum,
            total_moves,
            current_move,
            name,
        }
    }

    /// Read access to the whole field-value table.
    pub fn field_vals(&self) -> &Grid<Option<i32>> {
        &self.field_vals
    }
}

/// Computes `field_vals` and `sum` from scratch.
///
/// Every played cell adds its value to each empty neighbor, and adds it to
/// the sum once if it has at least one empty neighbor.
pub fn derive_field_vals(board: &Grid<Cell>) -> (Grid<Option<i32>>, i32) {
    let (rows, cols) = (board.rows(), board.cols());
    let mut field_vals = Grid::new(rows, cols, None);
    for (x, r, cell) in board.iter() {
        if cell.is_empty() {
            field_vals.set(x, r, Some(0));
        }
    }
    let mut sum = 0;
    for (x, r, cell) in board.iter() {
        let Cell::Played(value) = *cell else {
            continue;
        };
        let mut borders_empty = false;
        for (nx, nr) in adjacent_cells(rows, cols, x, r) {
            if let Some(v) = field_vals.get_mut(nx, nr) {
                *v += value;
                borders_empty = true;
            }
        }
        if borders_empty {
            sum += value;
        }
    }
    (field_vals, sum)
}

impl HexState for Position {
    fn board(&self) -> &Grid<Cell> {
        &self.board
    }

    fn field_val(&self, x: usize, row: usize) -> Option<i32> {
        *self.field_vals.get(x, row)
    }

    fn sum(&self) -> i32 {
        self.sum
    }

    fn total_moves(&self) -> u32 {
        self.total_moves
    }

    fn current_move(&self) -> u32 {
        self.current_move
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn play(&self, x: i32, y: i32) -> Result<Self, MoveError> {
        let (x, row) = check_move(self, x, y)?;
        let value = self.next_value();
        let (rows, cols) = (self.rows(), self.cols());

        let mut board = self.board.clone();
        let mut field_vals = self.field_vals.clone();
        board.set(x, row, Cell::Played(value));
        field_vals.set(x, row, None);

        let mut sum = self.sum;
        let mut borders_empty = false;
        for (nx, nr) in adjacent_cells(rows, cols, x, row) {
            match *board.get(nx, nr) {
                Cell::Blocked => {}
                Cell::Empty => {
                    if let Some(v) = field_vals.get_mut(nx, nr) {
                        *v += value;
                    }
                    borders_empty = true;
                }
                Cell::Played(neighbor) => {
                    // The new cell may have been this neighbor's last empty one.
                    let still_borders = adjacent_cells(rows, cols, nx, nr)
                        .any(|(ex, er)| field_vals.get(ex, er).is_some());
                    if !still_borders {
                        sum -= neighbor;
                    }
                }
            }
        }
        if borders_empty {
            sum += value;
        }

        Ok(Position {
            board,
            field_vals,
            sum,
            total_moves: self.total_moves,
            current_move: self.current_move + 1,
            name: self.name.clone(),
        })
    }
}
