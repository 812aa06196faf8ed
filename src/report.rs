use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::patrol::{CoverageRun, Pose, Terminal};
use crate::search::{CandidateScope, SearchResult, Strategy};

/// Both answers plus the context they were computed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Grid dimensions
    pub rows: i32,
    pub cols: i32,
    pub start: Pose,
    /// How the unobstructed patrol ended
    pub base_terminal: Terminal,
    /// Result 1: distinct positions visited
    pub visited: usize,
    /// Result 2: obstructions that trap the guard
    pub loop_obstructions: usize,
    pub loop_positions: Vec<Position>,
    pub candidates_tested: usize,
    pub strategy: Strategy,
    pub scope: CandidateScope,
    pub elapsed_ms: u64,
}

impl SolveReport {
    pub fn new(
        grid: &Grid,
        start: Pose,
        coverage: &CoverageRun,
        search: &SearchResult,
        strategy: Strategy,
        elapsed_ms: u64,
    ) -> Self {
        SolveReport {
            rows: grid.rows,
            cols: grid.cols,
            start,
            base_terminal: coverage.terminal,
            visited: coverage.visited_count(),
            loop_obstructions: search.count(),
            loop_positions: search.loop_obstructions.clone(),
            candidates_tested: search.candidates_tested,
            strategy,
            scope: search.scope,
            elapsed_ms,
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let report = serde_json::from_str(&json)?;
        Ok(report)
    }
}
