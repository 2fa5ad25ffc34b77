//! Text rendering of boards and hint overlays.
//!
//! One line per row, top row first, cells separated by single spaces.

use crate::board::{Cell, Grid};
use crate::eval::{CellEval, Evaluation};

/// Renders one board row: `.` blocked, `_` empty, signed numbers for
/// played cells.
pub fn format_row(cells: &[Cell]) -> String {
    cells
        .iter()
        .map(|cell| match cell {
            Cell::Blocked => ".".to_string(),
            Cell::Empty => "_".to_string(),
            Cell::Played(v) => v.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a whole board.
pub fn format_board(board: &Grid<Cell>) -> Vec<String> {
    (0..board.rows()).map(|r| format_row(board.row(r))).collect()
}

/// Renders a single evaluated cell.
pub fn format_cell_eval(eval: Option<CellEval>) -> String {
    match eval {
        None => ".".to_string(),
        Some(CellEval::Exact(winner)) => match winner.score() {
            -1 => "P1".to_string(),
            1 => "P2".to_string(),
            _ => "D".to_string(),
        },
        Some(CellEval::Estimate(mean)) => format!("{mean:.2}"),
    }
}

/// Renders an evaluation overlay for `board`.
pub fn format_hints(board: &Grid<Cell>, evaluation: &Evaluation) -> Vec<String> {
    (0..board.rows())
        .map(|r| {
            (0..board.cols())
                .map(|x| format_cell_eval(evaluation.cell(board, x, r)))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
