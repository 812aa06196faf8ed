//! Text layout parsing
//!
//! Format:
//! - `.`: open cell
//! - `#`: blocked cell
//! - `^`, `>`, `v`, `<`: the guard's start cell and facing (exactly one)

use tracing::debug;

use crate::direction::Direction;
use crate::error::{MalformedInput, Result};
use crate::grid::{Cell, Grid, Position};
use crate::patrol::Pose;

/// A parsed grid together with the guard's start pose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub grid: Grid,
    pub start: Pose,
}

impl Layout {
    /// Parse a whole text resource. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        Self::from_lines(&lines)
    }

    pub fn from_lines(lines: &[&str]) -> Result<Self> {
        let Some(first) = lines.first() else {
            return Err(MalformedInput::Empty.into());
        };

        let cols = first.chars().count();
        if cols == 0 {
            return Err(MalformedInput::Empty.into());
        }

        let (rows, width) = grid_dimensions(lines.len(), cols)?;
        let mut grid = Grid::new(rows, width)?;
        let mut start: Option<Pose> = None;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MalformedInput::Ragged { row, expected: cols, found }.into());
            }

            for (col, glyph) in line.chars().enumerate() {
                let pos = Position::new(row as i32, col as i32);
                match glyph {
                    '.' => {}
                    '#' => grid.set_cell(pos, Cell::Blocked),
                    _ => {
                        let Some(facing) = Direction::from_glyph(glyph) else {
                            return Err(MalformedInput::UnknownGlyph { row, col, glyph }.into());
                        };
                        if let Some(first) = start {
                            return Err(MalformedInput::MultipleStarts {
                                first: first.pos,
                                second: pos,
                            }
                            .into());
                        }
                        // The start cell stays open like any other
                        start = Some(Pose::new(pos, facing));
                    }
                }
            }
        }

        let start = start.ok_or(MalformedInput::NoStart)?;
        debug!(rows = grid.rows, cols = grid.cols, start = %start.pos, facing = ?start.facing, "parsed layout");

        Ok(Layout { grid, start })
    }
}

/// Line and column counts as grid dimensions, rejecting sizes whose cell
/// coordinates would not fit in an `i32`
fn grid_dimensions(rows: usize, cols: usize) -> std::result::Result<(i32, i32), MalformedInput> {
    match (i32::try_from(rows), i32::try_from(cols)) {
        (Ok(r), Ok(c)) => Ok((r, c)),
        _ => Err(MalformedInput::TooLarge {
            rows: rows as u64,
            cols: cols as u64,
        }),
    }
}
