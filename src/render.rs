//! Text rendering of a patrol and clipboard helpers
//!
//! Trail symbols:
//! - `#`: blocked cell
//! - `.`: open cell the guard never entered
//! - `|` / `-`: entered moving only vertically / only horizontally
//! - `+`: entered moving both ways
//! - `O`: obstruction that traps the guard
//! - start glyph (`^ > v <`): the guard's start cell

use arboard::Clipboard;
use tracing::{info, warn};

use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::patrol::Pose;

const VERTICAL: u8 = 1;
const HORIZONTAL: u8 = 2;

/// Render the trail left by `poses` over `grid`
pub fn render_trail(grid: &Grid, start: Pose, poses: &[Pose], obstructions: &[Position]) -> String {
    let mut marks = vec![0u8; grid.area()];
    for pose in poses {
        if grid.in_bounds(pose.pos) {
            let axis = if pose.facing.is_vertical() { VERTICAL } else { HORIZONTAL };
            marks[grid.get_id(pose.pos)] |= axis;
        }
    }

    let mut result = String::with_capacity(grid.area() + grid.rows as usize);
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let pos = Position::new(row, col);
            let symbol = if pos == start.pos {
                start.facing.glyph()
            } else if obstructions.contains(&pos) {
                'O'
            } else if !grid.is_open(pos) {
                '#'
            } else {
                match marks[grid.get_id(pos)] {
                    0 => '.',
                    VERTICAL => '|',
                    HORIZONTAL => '-',
                    _ => '+',
                }
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}

/// Put `text` on the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    info!(bytes = text.len(), "copied to clipboard");
    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
    std::thread::sleep(std::time::Duration::from_millis(100));
    Ok(())
}

/// Read a layout from the system clipboard
pub fn paste_from_clipboard() -> Result<String> {
    let mut clipboard = Clipboard::new()?;
    let text = clipboard.get_text()?;
    if text.trim().is_empty() {
        warn!("clipboard is empty");
    }
    Ok(text)
}
