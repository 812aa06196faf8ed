//! Loop-inducing obstruction search
//!
//! Every open cell other than the start is tried as one extra obstruction,
//! the guard is re-walked from the original start, and the placements that
//! trap it in a loop are collected.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{PatrolError, Result};
use crate::grid::{Grid, Position};
use crate::patrol::{check_start, coverage_run, loop_run_unchecked, Pose, Terminal};

/// How candidate trials share the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One grid, each candidate blocked and reopened in turn
    InPlace,
    /// Read-only grid, candidate passed to the walk as an overlay, trials spread over rayon
    #[default]
    Parallel,
}

/// Which cells are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateScope {
    /// Every open cell except the start
    #[default]
    AllOpen,
    /// Only cells the unobstructed patrol walks through.
    ///
    /// The guard only ever looks at the cell ahead and then either turns or
    /// steps into it, so a cell it never enters cannot change its route.
    PatrolPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub strategy: Strategy,
    pub scope: CandidateScope,
    /// Worker count for `Strategy::Parallel`; None uses the rayon default
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Obstructions that trap the guard, row-major order
    pub loop_obstructions: Vec<Position>,
    pub candidates_tested: usize,
    /// Scope actually used (PatrolPath falls back to AllOpen when the base patrol loops)
    pub scope: CandidateScope,
}

impl SearchResult {
    pub fn count(&self) -> usize {
        self.loop_obstructions.len()
    }
}

/// Candidate obstruction cells in row-major order
pub fn candidates(grid: &Grid, start: Pose, scope: CandidateScope) -> Result<(Vec<Position>, CandidateScope)> {
    match scope {
        CandidateScope::AllOpen => {
            let cells = grid.open_cells().filter(|&pos| pos != start.pos).collect();
            Ok((cells, CandidateScope::AllOpen))
        }
        CandidateScope::PatrolPath => {
            let base = coverage_run(grid, start)?;
            if base.terminal == Terminal::Looping {
                // Off-path cells keep the existing loop intact, so all of them count
                warn!("base patrol never leaves the grid; trying every open cell");
                return candidates(grid, start, CandidateScope::AllOpen);
            }

            let mut cells: Vec<Position> = base.visited.into_iter().filter(|&pos| pos != start.pos).collect();
            cells.sort_unstable();
            Ok((cells, CandidateScope::PatrolPath))
        }
    }
}

/// Search by blocking each candidate in `grid` itself and reopening it afterwards.
///
/// `grid` is identical to its input state when this returns, including on error.
pub fn search_in_place(grid: &mut Grid, start: Pose, scope: CandidateScope) -> Result<SearchResult> {
    check_start(grid, start, None)?;
    let (cells, scope) = candidates(grid, start, scope)?;

    let mut loop_obstructions = Vec::new();
    for &pos in &cells {
        let looped = grid.with_obstruction(pos, |g| loop_run_unchecked(g, start, None).is_loop())?;
        if looped {
            debug!(obstruction = %pos, "obstruction traps the guard");
            loop_obstructions.push(pos);
        }
    }

    Ok(SearchResult {
        loop_obstructions,
        candidates_tested: cells.len(),
        scope,
    })
}

/// Search with the candidate as an overlay on a shared read-only grid
pub fn search_overlay(grid: &Grid, start: Pose, scope: CandidateScope, threads: Option<usize>) -> Result<SearchResult> {
    check_start(grid, start, None)?;
    let (cells, scope) = candidates(grid, start, scope)?;

    let trial = || -> Vec<Position> {
        cells
            .par_iter()
            .copied()
            .filter(|&pos| loop_run_unchecked(grid, start, Some(pos)).is_loop())
            .collect()
    };

    let loop_obstructions = match threads.filter(|&n| n > 0) {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| PatrolError::Config(format!("failed to build worker pool: {}", e)))?;
            pool.install(trial)
        }
        None => trial(),
    };

    Ok(SearchResult {
        loop_obstructions,
        candidates_tested: cells.len(),
        scope,
    })
}

/// Run the search with the configured strategy
pub fn run_search(grid: &mut Grid, start: Pose, options: &SearchOptions) -> Result<SearchResult> {
    let started = Instant::now();

    let result = match options.strategy {
        Strategy::InPlace => search_in_place(grid, start, options.scope)?,
        Strategy::Parallel => search_overlay(grid, start, options.scope, options.threads)?,
    };

    info!(
        strategy = ?options.strategy,
        scope = ?result.scope,
        candidates = result.candidates_tested,
        loops = result.count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "obstruction search finished"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    const SAMPLE: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...
";

    fn sample_positions() -> Vec<Position> {
        [(6, 3), (7, 6), (7, 7), (8, 1), (8, 3), (9, 7)]
            .iter()
            .map(|&(r, c)| Position::new(r, c))
            .collect()
    }

    #[test]
    fn test_in_place_sample() {
        let mut layout = Layout::parse(SAMPLE).unwrap();
        let before = layout.grid.clone();

        let result = search_in_place(&mut layout.grid, layout.start, CandidateScope::AllOpen).unwrap();

        assert_eq!(result.count(), 6);
        assert_eq!(result.loop_obstructions, sample_positions());
        assert_eq!(layout.grid, before);
    }

    #[test]
    fn test_overlay_sample_single_worker() {
        let layout = Layout::parse(SAMPLE).unwrap();
        let result = search_overlay(&layout.grid, layout.start, CandidateScope::AllOpen, Some(1)).unwrap();
        assert_eq!(result.loop_obstructions, sample_positions());
    }

    #[test]
    fn test_candidates_exclude_start_and_blocked() {
        let layout = Layout::parse("#.\n.^\n").unwrap();
        let (cells, scope) = candidates(&layout.grid, layout.start, CandidateScope::AllOpen).unwrap();
        assert_eq!(cells, vec![Position::new(0, 1), Position::new(1, 0)]);
        assert_eq!(scope, CandidateScope::AllOpen);
    }

    #[test]
    fn test_path_scope_is_smaller_but_agrees() {
        let layout = Layout::parse(SAMPLE).unwrap();
        let all = search_overlay(&layout.grid, layout.start, CandidateScope::AllOpen, None).unwrap();
        let path = search_overlay(&layout.grid, layout.start, CandidateScope::PatrolPath, None).unwrap();

        assert_eq!(path.scope, CandidateScope::PatrolPath);
        assert_eq!(path.candidates_tested, 40);
        assert!(path.candidates_tested < all.candidates_tested);
        assert_eq!(path.loop_obstructions, all.loop_obstructions);
    }

    #[test]
    fn test_path_scope_falls_back_when_base_loops() {
        let mut layout = Layout::parse(".#...\n....#\n.^...\n#....\n...#.\n").unwrap();
        let options = SearchOptions {
            strategy: Strategy::InPlace,
            scope: CandidateScope::PatrolPath,
            threads: None,
        };

        let result = run_search(&mut layout.grid, layout.start, &options).unwrap();

        assert_eq!(result.scope, CandidateScope::AllOpen);
        assert_eq!(result.count(), 13);
    }

    #[test]
    fn test_single_cell_grid() {
        let mut layout = Layout::parse("^").unwrap();
        let result = run_search(&mut layout.grid, layout.start, &SearchOptions::default()).unwrap();
        assert_eq!(result.count(), 0);
        assert_eq!(result.candidates_tested, 0);
    }
}
