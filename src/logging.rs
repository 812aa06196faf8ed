//! Stderr diagnostics for the solver.
//!
//! The two answers are the only thing written to stdout, so the binary can be
//! piped straight into a checker. Every progress message and warning goes
//! through `tracing` to stderr instead.
//!
//! Logging has to be live before the configuration file is read, otherwise a
//! broken `guard_patrol.toml` would be replaced by defaults without a word.
//! `init` therefore installs a provisional filter and hands back a
//! [`LogHandle`] that swaps in the configured filter once it is known.

use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{PatrolError, Result};

/// Filter used until the configuration has been read
pub const DEFAULT_FILTER: &str = "warn";

/// Handle to the installed subscriber's filter
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set and is never replaced later; otherwise
/// [`DEFAULT_FILTER`] applies until [`LogHandle::apply_config`] is called.
///
/// ```bash
/// RUST_LOG=guard_patrol=debug guard_patrol input.txt
/// ```
pub fn init() -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    LogHandle { handle, from_env }
}

/// Parse a filter directive string such as `guard_patrol=debug,warn`
pub fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| PatrolError::Config(format!("invalid logging filter {:?}: {}", directives, e)))
}

impl LogHandle {
    /// Switch to the filter named in the configuration, unless `RUST_LOG` chose one
    pub fn apply_config(&self, directives: &str) -> Result<()> {
        if self.from_env {
            return Ok(());
        }
        let filter = parse_filter(directives)?;
        self.handle
            .reload(filter)
            .map_err(|e| PatrolError::Config(format!("cannot swap logging filter: {}", e)))
    }
}
