//! Error types for guard_patrol

use thiserror::Error;

use crate::grid::Position;

/// Why a layout could not be turned into a grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("layout has no lines")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layout of {rows}x{cols} cells is too large")]
    TooLarge { rows: u64, cols: u64 },

    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { row: usize, col: usize, glyph: char },

    #[error("no guard start marker found")]
    NoStart,

    #[error("more than one guard start marker ({first} and {second})")]
    MultipleStarts { first: Position, second: Position },
}

/// guard_patrol error type
#[derive(Error, Debug)]
pub enum PatrolError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl From<toml::de::Error> for PatrolError {
    fn from(e: toml::de::Error) -> Self {
        PatrolError::Config(e.to_string())
    }
}

impl From<arboard::Error> for PatrolError {
    fn from(e: arboard::Error) -> Self {
        PatrolError::Clipboard(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PatrolError>;
