//! Single-hole position variant.
//!
//! On boards with exactly `2 * moves + 1` playable cells one cell is left
//! empty when the game ends, and the final sum is the neighbor sum of that
//! cell. This variant keeps a running neighbor sum on every playable cell,
//! played or not, and defines `sum` as the total over empty cells. A move
//! then costs one subtraction plus one addition per neighbor, with no
//! re-scan for cells that stop bordering the empty region.
//!
//! Mid-game its `sum` can differ from the general [`Position`]'s; the two
//! agree whenever a single empty cell remains, which is all `check_winner`
//! looks at.

use super::adjacency::adjacent_cells;
use super::cell::Cell;
use super::grid::Grid;
use super::state::{check_move, HexState, MoveError, Position};

/// Raised when a position does not qualify for the single-hole variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{name}' has {cells} playable cells; the single-hole variant needs {needed}")]
pub struct ConversionError {
    pub name: String,
    pub cells: usize,
    pub needed: usize,
}

/// Position for boards where exactly one cell stays empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EndgamePosition {
    board: Grid<Cell>,
    /// Neighbor sums on every playable cell; 0 on blocked cells.
    neighbor_sums: Grid<i32>,
    sum: i32,
    total_moves: u32,
    current_move: u32,
    name: String,
}

impl TryFrom<&Position> for EndgamePosition {
    type Error = ConversionError;

    fn try_from(position: &Position) -> Result<Self, Self::Error> {
        let cells = position.playable_count();
        let needed = 2 * position.total_moves() as usize + 1;
        if cells != needed {
            return Err(ConversionError {
                name: position.name().to_string(),
                cells,
                needed,
            });
        }

        let board = position.board().clone();
        let (rows, cols) = (board.rows(), board.cols());
        let mut neighbor_sums = Grid::new(rows, cols, 0);
        for (x, r, cell) in board.iter() {
            if cell.is_blocked() {
                continue;
            }
            let total: i32 = adjacent_cells(rows, cols, x, r)
                .map(|(nx, nr)| board.get(nx, nr).value())
                .sum();
            neighbor_sums.set(x, r, total);
        }
        let sum = board
            .iter()
            .filter(|(_, _, c)| c.is_empty())
            .map(|(x, r, _)| *neighbor_sums.get(x, r))
            .sum();

        Ok(EndgamePosition {
            board,
            neighbor_sums,
            sum,
            total_moves: position.total_moves(),
            current_move: position.current_move(),
            name: position.name().to_string(),
        })
    }
}

impl HexState for EndgamePosition {
    fn board(&self) -> &Grid<Cell> {
        &self.board
    }

    fn field_val(&self, x: usize, row: usize) -> Option<i32> {
        if self.board.get(x, row).is_empty() {
            Some(*self.neighbor_sums.get(x, row))
        } else {
            None
        }
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
        let mut neighbor_sums = self.neighbor_sums.clone();
        board.set(x, row, Cell::Played(value));

        let mut sum = self.sum - *self.neighbor_sums.get(x, row);
        for (nx, nr) in adjacent_cells(rows, cols, x, row) {
            let cell = *board.get(nx, nr);
            if cell.is_blocked() {
                continue;
            }
            *neighbor_sums.get_mut(nx, nr) += value;
            if cell.is_empty() {
                sum += value;
            }
        }

        Ok(EndgamePosition {
            board,
            neighbor_sums,
            sum,
            total_moves: self.total_moves,
            current_move: self.current_move + 1,
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::presets;

    #[test]
    fn converts_single_hole_boards() {
        for layout in presets() {
            let pos = Position::new(&layout);
            let end = EndgamePosition::try_from(&pos).unwrap();
            assert_eq!(end.sum(), 0);
            assert_eq!(end.current_move(), 0);
            assert_eq!(end.name(), layout.name);
        }
    }

    #[test]
    fn conversion_rejects_other_boards() {
        let board = presets()[3].board.clone();
        let pos = Position::from_board(board, 3, "loose".to_string());
        let err = EndgamePosition::try_from(&pos).unwrap_err();
        assert_eq!(err.cells, 9);
        assert_eq!(err.needed, 7);
    }

    #[test]
    fn sum_tracks_empty_neighbor_sums() {
        let pos = Position::new(&presets()[0]);
        let mut end = EndgamePosition::try_from(&pos).unwrap();
        for (x, y) in [(0, 0), (2, 4), (1, 1), (3, 0), (2, 2)] {
            end = end.play(x, y).unwrap();
            let expected: i32 = end
                .empty_cells()
                .into_iter()
                .map(|(cx, cr)| end.field_val(cx, cr).unwrap())
                .sum();
            assert_eq!(end.sum(), expected);
        }
    }

    #[test]
    fn agrees_with_general_position_at_the_end() {
        let layout = &presets()[1];
        let mut general = Position::new(layout);
        let mut end = EndgamePosition::try_from(&general).unwrap();
        for (x, y) in [(1, 0), (0, 1), (2, 2), (2, 1), (1, 2), (2, 0)] {
            general = general.play(x, y).unwrap();
            end = end.play(x, y).unwrap();
            assert_eq!(general.board(), end.board());
        }
        assert!(end.is_over());
        assert_eq!(general.sum(), end.sum());
        assert_eq!(general.check_winner(), end.check_winner());
        let (hx, hr) = end.empty_cells()[0];
        assert_eq!(general.field_val(hx, hr), end.field_val(hx, hr));
    }

    #[test]
    fn converting_mid_game_keeps_counters() {
        let pos = Position::new(&presets()[3])
            .play(0, 0)
            .unwrap()
            .play(4, 0)
            .unwrap();
        let end = EndgamePosition::try_from(&pos).unwrap();
        assert_eq!(end.current_move(), 2);
        // 1 at x=0 borders x=1; -1 at x=4 borders x=3 and x=5.
        assert_eq!(end.field_val(1, 0), Some(1));
        assert_eq!(end.field_val(3, 0), Some(-1));
        assert_eq!(end.field_val(0, 0), None);
        assert_eq!(end.sum(), -1);
        assert_eq!(end.play(0, 0), Err(MoveError::Occupied { x: 0, y: 0 }));
    }
}
