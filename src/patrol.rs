//! Guard patrol state machine
//!
//! A patrol is a sequence of poses. From each pose the guard looks at the
//! cell ahead: leaving the grid ends the run, a blocked cell turns the guard
//! right in place, anything else is stepped into. The next pose depends only
//! on the current one, so a repeated pose means the guard loops forever.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::direction::Direction;
use crate::error::{PatrolError, Result};
use crate::grid::{Grid, Position};

/// Position plus facing: the full state of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub pos: Position,
    pub facing: Direction,
}

impl Pose {
    pub fn new(pos: Position, facing: Direction) -> Self {
        Pose { pos, facing }
    }
}

/// Result of applying the transition function once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Exit,
    Turn(Pose),
    Advance(Pose),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    Exited,
    Looping,
}

/// Compute the next transition from `pose`.
///
/// `obstruction` is an extra blocked cell layered over the grid.
pub fn step(grid: &Grid, pose: Pose, obstruction: Option<Position>) -> Transition {
    let ahead = pose.pos.step(pose.facing);

    if !grid.in_bounds(ahead) {
        Transition::Exit
    } else if grid.is_blocked_with(ahead, obstruction) {
        Transition::Turn(Pose::new(pose.pos, pose.facing.turn_right()))
    } else {
        Transition::Advance(Pose::new(ahead, pose.facing))
    }
}

/// Reject a start pose that lies outside the grid or on a blocked cell
pub fn check_start(grid: &Grid, start: Pose, obstruction: Option<Position>) -> Result<()> {
    if !grid.in_bounds(start.pos) {
        return Err(PatrolError::Precondition(format!(
            "start {} lies outside the {}x{} grid",
            start.pos, grid.rows, grid.cols
        )));
    }
    if grid.is_blocked_with(start.pos, obstruction) {
        return Err(PatrolError::Precondition(format!("start {} is blocked", start.pos)));
    }
    if let Some(obs) = obstruction {
        if !grid.in_bounds(obs) {
            return Err(PatrolError::Precondition(format!("obstruction {} lies outside the grid", obs)));
        }
    }
    Ok(())
}

/// Set of poses, one facing bitmask per cell
#[derive(Debug, Clone)]
pub struct PoseSet {
    facings: Vec<u8>,
    len: usize,
}

impl PoseSet {
    pub fn new(grid: &Grid) -> Self {
        PoseSet {
            facings: vec![0; grid.area()],
            len: 0,
        }
    }

    /// Returns false if the pose was already present
    pub fn insert(&mut self, grid: &Grid, pose: Pose) -> bool {
        let slot = &mut self.facings[grid.get_id(pose.pos)];
        let bit = pose.facing.bit();
        if *slot & bit != 0 {
            return false;
        }
        *slot |= bit;
        self.len += 1;
        true
    }

    pub fn contains(&self, grid: &Grid, pose: Pose) -> bool {
        self.facings[grid.get_id(pose.pos)] & pose.facing.bit() != 0
    }

    /// Number of distinct poses inserted so far
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Outcome of a coverage run
#[derive(Debug, Clone)]
pub struct CoverageRun {
    /// Distinct positions visited, including the start
    pub visited: HashSet<Position>,
    /// Every pose in visiting order, starting with the start pose
    pub poses: Vec<Pose>,
    pub terminal: Terminal,
    /// Transitions applied before the run ended
    pub steps: usize,
}

impl CoverageRun {
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Walk the guard from `start` until it leaves the grid, collecting the
/// positions it covers.
///
/// Poses are tracked as well so a layout whose patrol never leaves still
/// terminates, reporting `Terminal::Looping`.
pub fn coverage_run(grid: &Grid, start: Pose) -> Result<CoverageRun> {
    check_start(grid, start, None)?;

    let mut seen = PoseSet::new(grid);
    seen.insert(grid, start);

    let mut visited = HashSet::new();
    visited.insert(start.pos);
    let mut poses = vec![start];
    let mut pose = start;
    let mut steps = 0;

    let terminal = loop {
        pose = match step(grid, pose, None) {
            Transition::Exit => break Terminal::Exited,
            Transition::Turn(next) => next,
            Transition::Advance(next) => {
                visited.insert(next.pos);
                next
            }
        };
        steps += 1;

        if !seen.insert(grid, pose) {
            break Terminal::Looping;
        }
        poses.push(pose);
    };

    debug!(
        visited = visited.len(),
        poses = seen.len(),
        steps,
        terminal = ?terminal,
        "coverage run finished"
    );

    Ok(CoverageRun {
        visited,
        poses,
        terminal,
        steps,
    })
}

/// Outcome of a loop-detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopRun {
    pub terminal: Terminal,
    /// Transitions applied; at most `4 * rows * cols`
    pub steps: usize,
}

impl LoopRun {
    pub fn is_loop(&self) -> bool {
        self.terminal == Terminal::Looping
    }
}

/// Walk the guard from `start` until it leaves the grid or repeats a pose
pub fn loop_run(grid: &Grid, start: Pose, obstruction: Option<Position>) -> Result<LoopRun> {
    check_start(grid, start, obstruction)?;
    Ok(loop_run_unchecked(grid, start, obstruction))
}

/// `loop_run` without the start check, for callers that validated once
pub(crate) fn loop_run_unchecked(grid: &Grid, start: Pose, obstruction: Option<Position>) -> LoopRun {
    let mut seen = PoseSet::new(grid);
    seen.insert(grid, start);

    let mut pose = start;
    let mut steps = 0;

    let terminal = loop {
        pose = match step(grid, pose, obstruction) {
            Transition::Exit => break Terminal::Exited,
            Transition::Turn(next) | Transition::Advance(next) => next,
        };
        steps += 1;

        if !seen.insert(grid, pose) {
            break Terminal::Looping;
        }
    };

    trace!(obstruction = ?obstruction, steps, terminal = ?terminal, "loop run finished");

    LoopRun { terminal, steps }
}
