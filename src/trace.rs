use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::direction::Direction;
use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::patrol::{check_start, step, Pose, PoseSet, Terminal, Transition};

/// Something the guard did during one patrol
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolEvent {
    /// Guard placed at its start pose
    Start { row: i32, col: i32, facing: Direction },
    /// Stepped forward into (row, col)
    Advance { row: i32, col: i32 },
    /// Turned in place to face `facing`
    Turn { row: i32, col: i32, facing: Direction },
    /// Walked off the grid from (row, col)
    Exit { row: i32, col: i32 },
    /// Reached a pose it had already been in
    Loop { row: i32, col: i32, facing: Direction },
}

/// Event with the transition index it happened at
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub step: usize,
    pub event: PatrolEvent,
}

/// Ordered record of one patrol
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TraceLog {
    events: Vec<LoggedEvent>,
}

impl TraceLog {
    pub fn new() -> Self {
        TraceLog { events: Vec::new() }
    }

    /// Walk the guard and record every transition.
    ///
    /// `obstruction` is layered over the grid like in a loop run.
    pub fn record(grid: &Grid, start: Pose, obstruction: Option<Position>) -> Result<Self> {
        check_start(grid, start, obstruction)?;

        let mut log = TraceLog::new();
        log.log(
            0,
            PatrolEvent::Start {
                row: start.pos.row,
                col: start.pos.col,
                facing: start.facing,
            },
        );

        let mut seen = PoseSet::new(grid);
        seen.insert(grid, start);
        let mut pose = start;
        let mut steps = 0;

        loop {
            let next = match step(grid, pose, obstruction) {
                Transition::Exit => {
                    log.log(steps, PatrolEvent::Exit { row: pose.pos.row, col: pose.pos.col });
                    break;
                }
                Transition::Turn(next) => {
                    log.log(
                        steps + 1,
                        PatrolEvent::Turn {
                            row: next.pos.row,
                            col: next.pos.col,
                            facing: next.facing,
                        },
                    );
                    next
                }
                Transition::Advance(next) => {
                    log.log(steps + 1, PatrolEvent::Advance { row: next.pos.row, col: next.pos.col });
                    next
                }
            };
            steps += 1;
            pose = next;

            if seen.contains(grid, pose) {
                log.log(
                    steps,
                    PatrolEvent::Loop {
                        row: pose.pos.row,
                        col: pose.pos.col,
                        facing: pose.facing,
                    },
                );
                break;
            }
            seen.insert(grid, pose);
        }

        Ok(log)
    }

    pub fn log(&mut self, step: usize, event: PatrolEvent) {
        self.events.push(LoggedEvent { step, event });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// How the recorded patrol ended, if it has
    pub fn terminal(&self) -> Option<Terminal> {
        match self.events.last().map(|logged| &logged.event) {
            Some(PatrolEvent::Exit { .. }) => Some(Terminal::Exited),
            Some(PatrolEvent::Loop { .. }) => Some(Terminal::Looping),
            _ => None,
        }
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut advances = 0;
        let mut turns = 0;

        for logged in &self.events {
            match logged.event {
                PatrolEvent::Advance { .. } => advances += 1,
                PatrolEvent::Turn { .. } => turns += 1,
                _ => {}
            }
        }

        let ending = match self.terminal() {
            Some(Terminal::Exited) => "left the grid",
            Some(Terminal::Looping) => "stuck in a loop",
            None => "unfinished",
        };

        format!(
            "Transitions: {} ({} moves, {} turns)\nOutcome: {}",
            advances + turns,
            advances,
            turns,
            ending
        )
    }
}
