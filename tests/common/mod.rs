#![allow(dead_code)]

use guard_patrol::patrol::coverage_run;
use guard_patrol::search::{search_in_place, search_overlay};
use guard_patrol::{CandidateScope, Grid, Layout, Position, Terminal};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixture stored as JSON under test_data/
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatrolTestData {
    #[serde(rename = "testName")]
    pub test_name: String,
    pub layout: Vec<String>,
    #[serde(rename = "expectedVisited")]
    pub expected_visited: usize,
    #[serde(rename = "expectedLoops")]
    pub expected_loops: usize,
    #[serde(rename = "expectedTerminal")]
    pub expected_terminal: Terminal,
}

/// Answers computed for one layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub visited: usize,
    pub loops: usize,
    pub terminal: Terminal,
}

/// Load a test from JSON file
pub fn load_test(path: &Path) -> Result<PatrolTestData, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let test_data: PatrolTestData = serde_json::from_str(&contents)?;
    Ok(test_data)
}

/// Fixture files in `dir` with the given extension, sorted by name
pub fn fixture_files(dir: &str, extension: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", dir, e))
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(extension))
        .collect();
    paths.sort();
    paths
}

/// Rotate a layout 90 degrees clockwise, turning the start glyph with it.
/// The patrol rules are rotation invariant, so both answers are unchanged.
pub fn rotate_layout_cw(lines: &[String]) -> Vec<String> {
    let rows: Vec<Vec<char>> = lines.iter().map(|line| line.chars().collect()).collect();
    let height = rows.len();
    let width = rows[0].len();

    (0..width)
        .map(|col| {
            (0..height)
                .map(|row| match rows[height - 1 - row][col] {
                    '^' => '>',
                    '>' => 'v',
                    'v' => '<',
                    '<' => '^',
                    other => other,
                })
                .collect()
        })
        .collect()
}

pub fn parse_lines(lines: &[String]) -> Layout {
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    Layout::from_lines(&refs).expect("fixture layout parses")
}

/// Compute both answers, cross-checking the in-place and overlay searches
pub fn solve(layout: &Layout) -> Answers {
    let coverage = coverage_run(&layout.grid, layout.start).expect("coverage run");

    let mut grid: Grid = layout.grid.clone();
    let in_place = search_in_place(&mut grid, layout.start, CandidateScope::AllOpen).expect("in-place search");
    assert_eq!(grid, layout.grid, "in-place search left the grid modified");

    let overlay = search_overlay(&layout.grid, layout.start, CandidateScope::PatrolPath, None).expect("overlay search");
    assert_eq!(
        in_place.loop_obstructions, overlay.loop_obstructions,
        "strategies disagree on loop obstructions"
    );

    Answers {
        visited: coverage.visited_count(),
        loops: in_place.count(),
        terminal: coverage.terminal,
    }
}

/// Run a single test variant
pub fn run_single_test(lines: &[String], test_data: &PatrolTestData) -> (bool, Answers) {
    let answers = solve(&parse_lines(lines));
    let expected = Answers {
        visited: test_data.expected_visited,
        loops: test_data.expected_loops,
        terminal: test_data.expected_terminal,
    };
    (answers == expected, answers)
}

/// Run a test with all 4 rotations
/// Returns (all_passed, failed_variant_name_if_any, actual_answers_of_failure)
pub fn run_test(test_data: &PatrolTestData) -> (bool, Option<String>, Option<Answers>) {
    let rot90 = rotate_layout_cw(&test_data.layout);
    let rot180 = rotate_layout_cw(&rot90);
    let rot270 = rotate_layout_cw(&rot180);

    let variants = vec![
        ("original", test_data.layout.clone()),
        ("rot90", rot90),
        ("rot180", rot180),
        ("rot270", rot270),
    ];

    for (variant_name, lines) in variants {
        let (passed, answers) = run_single_test(&lines, test_data);
        if !passed {
            return (false, Some(variant_name.to_string()), Some(answers));
        }
    }

    (true, None, None)
}

/// Parse an annotated trail file from test_data/standard
/// Format:
/// - `^ > v <`: start position and facing (counts as visited)
/// - `#`: blocked cell
/// - `.`: open cell the guard never enters
/// - `X`: open cell the guard enters
/// - `O`: open cell the guard enters where an obstruction traps it
pub fn parse_standard_test(path: &Path) -> Result<(Layout, usize, HashSet<Position>), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;

    let mut visited = 0;
    let mut loop_cells = HashSet::new();
    let mut plain = Vec::new();

    for (row, line) in contents.lines().filter(|line| !line.trim().is_empty()).enumerate() {
        let mut stripped = String::with_capacity(line.len());
        for (col, ch) in line.chars().enumerate() {
            match ch {
                'X' => {
                    visited += 1;
                    stripped.push('.');
                }
                'O' => {
                    visited += 1;
                    loop_cells.insert(Position::new(row as i32, col as i32));
                    stripped.push('.');
                }
                '^' | '>' | 'v' | '<' => {
                    visited += 1;
                    stripped.push(ch);
                }
                _ => stripped.push(ch),
            }
        }
        plain.push(stripped);
    }

    let layout = Layout::parse(&plain.join("\n"))?;
    Ok((layout, visited, loop_cells))
}
