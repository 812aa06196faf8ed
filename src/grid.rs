use serde::{Deserialize, Serialize};
use std::fmt;

use crate::direction::Direction;
use crate::error::{MalformedInput, PatrolError, Result};

/// A cell coordinate. May lie outside the grid after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// The neighbouring position one step towards `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.delta();
        Position::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Blocked,
}

/// Rectangular occupancy grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with all cells open.
    ///
    /// Both dimensions must be positive and `rows * cols` must fit in an
    /// `i32`, which keeps every cell ID computation overflow free.
    pub fn new(rows: i32, cols: i32) -> std::result::Result<Self, MalformedInput> {
        if rows <= 0 || cols <= 0 {
            return Err(MalformedInput::Empty);
        }
        let area = rows
            .checked_mul(cols)
            .and_then(|area| usize::try_from(area).ok())
            .ok_or(MalformedInput::TooLarge {
                rows: u64::from(rows.unsigned_abs()),
                cols: u64::from(cols.unsigned_abs()),
            })?;

        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::Open; area],
        })
    }

    /// Create a grid with specific blocked cells
    pub fn with_blocked(rows: i32, cols: i32, blocked: &[Position]) -> std::result::Result<Self, MalformedInput> {
        let mut grid = Self::new(rows, cols)?;
        for &pos in blocked {
            grid.set_cell(pos, Cell::Blocked);
        }
        Ok(grid)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.rows && pos.col >= 0 && pos.col < self.cols
    }

    /// Convert a position to its cell ID
    pub fn get_id(&self, pos: Position) -> usize {
        (pos.row * self.cols + pos.col) as usize
    }

    /// Convert a cell ID back to a position
    pub fn get_coords(&self, id: usize) -> Position {
        let id = id as i32;
        Position::new(id / self.cols, id % self.cols)
    }

    /// Cell at `pos`, or None outside the grid
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.cells[self.get_id(pos)])
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Open)
    }

    /// Blocked check with an optional hypothetical obstruction layered on top.
    /// Out of bounds is not blocked; callers check bounds first.
    pub fn is_blocked_with(&self, pos: Position, obstruction: Option<Position>) -> bool {
        obstruction == Some(pos) || self.cell(pos) == Some(Cell::Blocked)
    }

    /// Set cell value at `pos`. Positions outside the grid are ignored.
    pub fn set_cell(&mut self, pos: Position, value: Cell) {
        if self.in_bounds(pos) {
            let id = self.get_id(pos);
            self.cells[id] = value;
        }
    }

    /// Block `pos` for the duration of `f`, then reopen it.
    ///
    /// `pos` must be an open cell inside the grid. The exclusive borrow held
    /// for the whole call means only one cell is ever mutated at a time.
    pub fn with_obstruction<T>(&mut self, pos: Position, f: impl FnOnce(&Grid) -> T) -> Result<T> {
        if !self.is_open(pos) {
            return Err(PatrolError::Precondition(format!(
                "obstruction {} is not an open cell of a {}x{} grid",
                pos, self.rows, self.cols
            )));
        }

        let id = self.get_id(pos);
        self.cells[id] = Cell::Blocked;
        let result = f(self);
        self.cells[id] = Cell::Open;

        Ok(result)
    }

    /// All open positions in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Open)
            .map(|(id, _)| self.get_coords(id))
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }
}
