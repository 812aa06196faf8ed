pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod patrol;
pub mod render;
pub mod report;
pub mod search;
pub mod trace;

pub use direction::Direction;
pub use error::{MalformedInput, PatrolError, Result};
pub use grid::{Cell, Grid, Position};
pub use layout::Layout;
pub use patrol::{coverage_run, loop_run, Pose, Terminal};
pub use search::{run_search, CandidateScope, SearchOptions, SearchResult, Strategy};
