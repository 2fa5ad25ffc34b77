//! Neighbor relation on the offset hex grid.
//!
//! Rows alternate between two horizontal offsets. A row is "shifted" (drawn
//! half a cell to the right) when `(|y| + row_parity)` is even, so with
//! parity 0 row 0 is shifted. Shifted and unshifted rows use different
//! delta tables. No bounds checking happens in
//! [`neighbors`]; [`adjacent_cells`] intersects the result with a grid.
//!
//! Positions store rows top-first while players address them bottom-first,
//! so positions pass [`row_parity_for`] to keep the bottom row unshifted.

/// Deltas `(dx, dy)` for cells in a shifted row.
const SHIFTED_DELTAS: [(i32, i32); 6] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, 0)];

/// Deltas `(dx, dy)` for cells in an unshifted row.
const UNSHIFTED_DELTAS: [(i32, i32); 6] = [(-1, 1), (0, 1), (1, 0), (0, -1), (-1, -1), (-1, 0)];

/// Returns the six neighbor coordinates of `(x, y)`.
///
/// `row_parity` is taken mod 2; 1 leaves even rows unshifted.
pub fn neighbors(x: i32, y: i32, row_parity: usize) -> [(i32, i32); 6] {
    let shifted = (y.unsigned_abs() as usize + row_parity) % 2 == 0;
    let deltas = if shifted {
        &SHIFTED_DELTAS
    } else {
        &UNSHIFTED_DELTAS
    };
    deltas.map(|(dx, dy)| (x + dx, y + dy))
}

/// Row parity that makes internal (top-first) row indices agree with the
/// bottom-first numbering, under which even rows are never shifted.
pub const fn row_parity_for(rows: usize) -> usize {
    rows % 2
}

/// Iterates the in-bounds neighbors of `(x, row)` on a `rows x cols` grid.
///
/// Blocked cells are not filtered here; callers check cell contents.
pub fn adjacent_cells(
    rows: usize,
    cols: usize,
    x: usize,
    row: usize,
) -> impl Iterator<Item = (usize, usize)> {
    neighbors(x as i32, row as i32, row_parity_for(rows))
        .into_iter()
        .filter(move |&(nx, ny)| nx >= 0 && ny >= 0 && (nx as usize) < cols && (ny as usize) < rows)
        .map(|(nx, ny)| (nx as usize, ny as usize))
}
