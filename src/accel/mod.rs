//! Accelerated whole-board solver boundary.
//!
//! An accelerated solver works on a dense encoding of single-hole boards:
//! every playable cell gets an index in row-major order, adjacency is a
//! flat list of neighbor indices with `-1` after each cell, and cell values
//! are negated (its Player 1 places negative numbers). Any return code with
//! magnitude at least [`GAVE_UP`] means the solver gave up.
//!
//! [`native::NativeSolver`] is an in-process implementation of the same
//! contract.

pub mod native;

use std::time::Duration;

use tracing::{debug, warn};

use crate::board::{adjacent_cells, Grid, HexState, Winner};

pub use native::NativeSolver;

/// Return codes at or beyond this magnitude are not results.
pub const GAVE_UP: i32 = 2000;

/// Terminator between per-cell adjacency lists.
pub const ADJ_END: i32 = -1;

/// Interface of an accelerated solver.
pub trait AcceleratedSolver {
    /// Caps the wall-clock time of the next `solve_current`.
    fn set_time_limit(&mut self, limit: Duration);

    /// Loads the board graph: neighbor indices per cell, each list ended by
    /// [`ADJ_END`].
    fn init_adj(&mut self, adjacency: &[i32]);

    /// Loads cell values (negated, 0 for empty), one per dense index.
    fn init_state(&mut self, values: &[i32]);

    /// Solves the loaded state. On success `values` is overwritten with one
    /// result per cell from the mover's point of view: positive wins,
    /// negative loses, zero draws.
    fn solve_current(&mut self, values: &mut [i32]) -> i32;
}

/// Dense encoding of a board for an accelerated solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseBoard {
    /// Dense index per cell; `None` for blocked cells.
    pub index: Grid<Option<usize>>,
    /// Flat adjacency with [`ADJ_END`] terminators.
    pub adjacency: Vec<i32>,
    /// Negated cell values in dense order.
    pub values: Vec<i32>,
}

impl DenseBoard {
    pub fn encode<S: HexState>(state: &S) -> Self {
        let board = state.board();
        let (rows, cols) = (board.rows(), board.cols());
        let mut index = Grid::new(rows, cols, None);
        let mut values = Vec::new();
        for (x, r, cell) in board.iter() {
            if !cell.is_blocked() {
                index.set(x, r, Some(values.len()));
                values.push(-cell.value());
            }
        }

        let mut adjacency = Vec::new();
        for (x, r, cell) in board.iter() {
            if cell.is_blocked() {
                continue;
            }
            for (nx, nr) in adjacent_cells(rows, cols, x, r) {
                if let Some(i) = *index.get(nx, nr) {
                    adjacency.push(i as i32);
                }
            }
            adjacency.push(ADJ_END);
        }

        DenseBoard {
            index,
            adjacency,
            values,
        }
    }

    /// Number of playable cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Maps a per-cell result read back from the solver to a [`Winner`].
///
/// Results are relative to the player about to move, so the mapping flips
/// with the parity of the move.
pub fn decode_result(result: i32, player_one_to_move: bool) -> Winner {
    let mover_wins = result.signum();
    if player_one_to_move {
        Winner::from_score(-mover_wins)
    } else {
        Winner::from_score(mover_wins)
    }
}

/// Evaluates every empty cell with an accelerated solver.
///
/// Returns `None` when the return code reaches `code_bound` in magnitude;
/// the caller falls back to its own search. Outcomes are placed as -1, 0 or
/// 1 on empty cells and 0 elsewhere.
pub fn accelerated_options<A, S>(
    solver: &mut A,
    state: &S,
    limit: Duration,
    code_bound: i32,
) -> Option<Grid<f64>>
where
    A: AcceleratedSolver + ?Sized,
    S: HexState,
{
    let dense = DenseBoard::encode(state);
    let DenseBoard {
        index,
        adjacency,
        mut values,
    } = dense;

    solver.set_time_limit(limit);
    solver.init_adj(&adjacency);
    solver.init_state(&values);
    let code = solver.solve_current(&mut values);
    if code.abs() >= code_bound {
        warn!(code, "accelerated solver gave up");
        return None;
    }
    debug!(code, cells = values.len(), "accelerated solver finished");

    let player_one = state.player_one_to_move();
    let board = state.board();
    let mut grid = Grid::new(board.rows(), board.cols(), 0.0);
    for (x, r, cell) in board.iter() {
        if !cell.is_empty() {
            continue;
        }
        if let Some(i) = *index.get(x, r) {
            let winner = decode_result(values[i], player_one);
            grid.set(x, r, f64::from(winner.score()));
        }
    }
    Some(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{presets, Position};

    /// Records calls and returns a fixed code.
    struct Scripted {
        code: i32,
        fill: i32,
        adjacency: Vec<i32>,
        state: Vec<i32>,
        limit: Option<Duration>,
    }

    impl Scripted {
        fn new(code: i32, fill: i32) -> Self {
            Scripted {
                code,
                fill,
                adjacency: Vec::new(),
                state: Vec::new(),
                limit: None,
            }
        }
    }

    impl AcceleratedSolver for Scripted {
        fn set_time_limit(&mut self, limit: Duration) {
            self.limit = Some(limit);
        }

        fn init_adj(&mut self, adjacency: &[i32]) {
            self.adjacency = adjacency.to_vec();
        }

        fn init_state(&mut self, values: &[i32]) {
            self.state = values.to_vec();
        }

        fn solve_current(&mut self, values: &mut [i32]) -> i32 {
            for v in values.iter_mut() {
                *v = self.fill;
            }
            self.code
        }
    }

    #[test]
    fn encodes_line_adjacency() {
        let pos = Position::new(&presets()[3]).play(0, 0).unwrap();
        let dense = DenseBoard::encode(&pos);
        assert_eq!(dense.len(), 9);
        assert_eq!(dense.values[0], -1);
        assert_eq!(&dense.adjacency[..5], &[1, ADJ_END, 2, 0, ADJ_END]);
        assert_eq!(dense.adjacency.iter().filter(|&&v| v == ADJ_END).count(), 9);
    }

    #[test]
    fn encodings_compare_by_value() {
        fn total_eq<T: Eq>(a: &T, b: &T) -> bool {
            a == b
        }
        let pos = Position::new(&presets()[1]);
        assert!(total_eq(&DenseBoard::encode(&pos), &DenseBoard::encode(&pos.clone())));
        let moved = pos.play(1, 0).unwrap();
        assert!(!total_eq(&DenseBoard::encode(&pos), &DenseBoard::encode(&moved)));
    }

    #[test]
    fn encoding_skips_blocked_cells() {
        let pos = Position::new(&presets()[1]);
        let dense = DenseBoard::encode(&pos);
        assert_eq!(dense.len(), 7);
        assert_eq!(*dense.index.get(0, 0), None);
        assert_eq!(*dense.index.get(1, 0), Some(0));
        assert_eq!(*dense.index.get(0, 1), Some(2));
    }

    #[test]
    fn decode_flips_with_parity() {
        assert_eq!(decode_result(5, true), Winner::PlayerOne);
        assert_eq!(decode_result(5, false), Winner::PlayerTwo);
        assert_eq!(decode_result(-2, true), Winner::PlayerTwo);
        assert_eq!(decode_result(-2, false), Winner::PlayerOne);
        assert_eq!(decode_result(0, true), Winner::Draw);
    }

    #[test]
    fn gave_up_is_discarded() {
        let pos = Position::new(&presets()[1]);
        let mut solver = Scripted::new(GAVE_UP, 1);
        assert!(accelerated_options(&mut solver, &pos, Duration::from_secs(1), GAVE_UP).is_none());
        let mut solver = Scripted::new(-GAVE_UP, 1);
        assert!(accelerated_options(&mut solver, &pos, Duration::from_secs(1), GAVE_UP).is_none());
    }

    #[test]
    fn results_land_on_empty_cells() {
        let pos = Position::new(&presets()[1]).play(1, 0).unwrap();
        let mut solver = Scripted::new(3, 3);
        let grid = accelerated_options(&mut solver, &pos, Duration::from_millis(250), GAVE_UP).unwrap();
        assert_eq!(solver.limit, Some(Duration::from_millis(250)));
        assert_eq!(solver.state.iter().filter(|&&v| v == -1).count(), 1);
        // Player 2 to move and "mover wins" everywhere.
        for (x, r, cell) in pos.board().iter() {
            let expected = if cell.is_empty() { 1.0 } else { 0.0 };
            assert_eq!(*grid.get(x, r), expected);
        }
    }
}
