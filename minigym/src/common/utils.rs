use super::defs::*;

/// Grid cell as (row, column).
pub type Cell = (usize, usize);

pub const UP: Discrete = 0;
pub const DOWN: Discrete = 1;
pub const LEFT: Discrete = 2;
pub const RIGHT: Discrete = 3;
pub const N_MOVES: usize = 4;

/// Row major rectangular grid.
pub trait Grid {
    /// (rows, columns)
    fn shape(&self) -> (usize, usize);
}

/// Moves one cell in the direction of `a`, clamped to the grid. `a` must already be a valid
/// move.
pub fn move_in_grid(cell: Cell, a: Discrete, rows: usize, cols: usize) -> Cell {
    let (r, c) = cell;
    match a {
        UP => (r.saturating_sub(1), c),
        DOWN => ((r + 1).min(rows - 1), c),
        LEFT => (r, c.saturating_sub(1)),
        _ => (r, (c + 1).min(cols - 1)),
    }
}

pub fn cell_index(cell: Cell, cols: usize) -> Discrete {
    cell.0 * cols + cell.1
}

pub fn index_cell(s: Discrete, cols: usize) -> Cell {
    (s / cols, s % cols)
}
