//! Board layouts.
//!
//! A layout is the raw material a game starts from: a grid of cell markers
//! and the number of moves each player gets. The built-in presets all leave
//! exactly one cell empty at the end of the game. Layouts can also be read
//! from JSON files or generated at random.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::grid::Grid;

/// Errors raised while building or loading layouts.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout '{0}' has no rows or rows of unequal length")]
    NotRectangular(String),

    #[error("layout '{name}' has {cells} playable cells, needs more than {needed}")]
    TooFewCells {
        name: String,
        cells: usize,
        needed: usize,
    },

    #[error("failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of a layout: `null` marks a blocked cell, `0` an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub name: String,
    pub board: Vec<Vec<Option<i32>>>,
    pub moves: u32,
}

/// A validated layout ready to start a game from.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub name: String,
    pub board: Grid<Cell>,
    pub moves: u32,
}

impl BoardLayout {
    /// Validates a serialized layout.
    pub fn from_spec(spec: LayoutSpec) -> Result<Self, LayoutError> {
        let LayoutSpec { name, board, moves } = spec;
        let rows: Vec<Vec<Cell>> = board
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from_marker).collect())
            .collect();
        let board = match Grid::from_rows(rows) {
            Some(g) => g,
            None => return Err(LayoutError::NotRectangular(name)),
        };
        let layout = BoardLayout { name, board, moves };
        let cells = layout.playable_cells();
        let needed = 2 * moves as usize;
        if cells <= needed {
            return Err(LayoutError::TooFewCells {
                name: layout.name,
                cells,
                needed,
            });
        }
        Ok(layout)
    }

    /// Converts back into the serialized form.
    pub fn to_spec(&self) -> LayoutSpec {
        LayoutSpec {
            name: self.name.clone(),
            board: self
                .board
                .to_rows()
                .into_iter()
                .map(|row| row.into_iter().map(Cell::marker).collect())
                .collect(),
            moves: self.moves,
        }
    }

    /// Number of non-blocked cells.
    pub fn playable_cells(&self) -> usize {
        self.board.iter().filter(|(_, _, c)| !c.is_blocked()).count()
    }
}

/// Parses a JSON array of layouts.
pub fn parse_layouts(json: &str) -> Result<Vec<BoardLayout>, LayoutError> {
    let specs: Vec<LayoutSpec> = serde_json::from_str(json)?;
    specs.into_iter().map(BoardLayout::from_spec).collect()
}

/// Loads a JSON array of layouts from disk.
pub fn load_layouts(path: &Path) -> Result<Vec<BoardLayout>, LayoutError> {
    let data = fs::read_to_string(path)?;
    parse_layouts(&data)
}

const X: Option<i32> = None;
const O: Option<i32> = Some(0);

fn preset(name: &str, board: &[&[Option<i32>]], moves: u32) -> LayoutSpec {
    LayoutSpec {
        name: name.to_string(),
        board: board.iter().map(|r| r.to_vec()).collect(),
        moves,
    }
}

/// The built-in layouts, in menu order.
pub fn preset_specs() -> Vec<LayoutSpec> {
    vec![
        preset(
            "THE Triangle",
            &[
                &[X, X, O, X, X],
                &[X, O, O, X, X],
                &[X, O, O, O, X],
                &[O, O, O, O, X],
                &[O, O, O, O, O],
            ],
            7,
        ),
        preset(
            "Small Hexagon",
            &[&[X, O, O, X], &[O, O, O, X], &[X, O, O, X]],
            3,
        ),
        preset(
            "THE Hexagon",
            &[
                &[X, O, O, O, X],
                &[O, O, O, O, X],
                &[O, O, O, O, O],
                &[O, O, O, O, X],
                &[X, O, O, O, X],
            ],
            9,
        ),
        preset("THE Line", &[&[O, O, O, O, O, O, O, O, O]], 4),
        preset(
            "THE Wheel",
            &[
                &[X, O, O, O, X],
                &[O, X, X, O, X],
                &[O, O, O, O, O],
                &[O, X, X, O, X],
                &[X, O, O, O, X],
            ],
            7,
        ),
        preset(
            "Triangle 21",
            &[
                &[X, X, O, X, X, X],
                &[X, X, O, O, X, X],
                &[X, O, O, O, X, X],
                &[X, O, O, O, O, X],
                &[O, O, O, O, O, X],
                &[O, O, O, O, O, O],
            ],
            10,
        ),
    ]
}

/// The built-in layouts, validated.
pub fn presets() -> Vec<BoardLayout> {
    preset_specs()
        .into_iter()
        .filter_map(|spec| BoardLayout::from_spec(spec).ok())
        .collect()
}

/// Generates a random layout with an odd number of playable cells.
///
/// The grid is square with side 4..=10; every cell is kept with
/// probability 1/2, and the trailing cell of each row that is shifted when
/// counted from the bottom is always blocked so the outline stays flush.
pub fn random_layout<R: Rng + ?Sized>(rng: &mut R) -> BoardLayout {
    loop {
        let size: usize = rng.gen_range(4..=10);
        let mut board = Grid::new(size, size, Cell::Blocked);
        let mut cells = 0usize;
        let mut last = None;
        for y in 0..size {
            for x in 0..size {
                if (y + size + 1) % 2 == 1 && x == size - 1 {
                    continue;
                }
                if rng.gen_bool(0.5) {
                    board.set(x, y, Cell::Empty);
                    cells += 1;
                    last = Some((x, y));
                }
            }
        }
        if cells % 2 == 0 {
            if let Some((x, y)) = last {
                board.set(x, y, Cell::Blocked);
                cells -= 1;
            }
        }
        if cells < 3 {
            continue;
        }
        return BoardLayout {
            name: "Random Board".to_string(),
            board,
            moves: ((cells - 1) / 2) as u32,
        };
    }
}
