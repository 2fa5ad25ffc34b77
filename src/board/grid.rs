//! Rectangular row-major storage.
//!
//! Boards, field-value tables and evaluation overlays all share this shape.
//! Row 0 is the top row; `x` runs left to right.

/// A dense `rows x cols` grid stored in a flat vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid filled with `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Builds a grid from nested rows. Returns `None` if the rows are ragged
    /// or there are none.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len)?;
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Grid {
            rows: height,
            cols: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if signed coordinates fall inside the grid.
    pub fn contains(&self, x: i32, row: i32) -> bool {
        x >= 0 && row >= 0 && (x as usize) < self.cols && (row as usize) < self.rows
    }

    #[inline]
    fn index(&self, x: usize, row: usize) -> usize {
        debug_assert!(x < self.cols && row < self.rows);
        row * self.cols + x
    }

    #[inline]
    pub fn get(&self, x: usize, row: usize) -> &T {
        &self.cells[self.index(x, row)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, row: usize) -> &mut T {
        let idx = self.index(x, row);
        &mut self.cells[idx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, row: usize, value: T) {
        let idx = self.index(x, row);
        self.cells[idx] = value;
    }

    /// Iterates `(x, row, &value)` in row-major order, top row first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % cols, i / cols, v))
    }

    /// Returns one row as a slice.
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Converts into nested rows, top row first.
    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }
}
