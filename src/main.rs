//! Guard patrol solver.
//!
//! Prints the number of distinct cells the guard covers before leaving the
//! lab, then the number of single obstructions that trap it in a loop.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use guard_patrol::config::Config;
use guard_patrol::render::{copy_to_clipboard, paste_from_clipboard, render_trail};
use guard_patrol::report::SolveReport;
use guard_patrol::trace::TraceLog;
use guard_patrol::{coverage_run, logging, run_search, CandidateScope, Layout, Strategy, Terminal};

#[derive(Parser)]
#[command(name = "guard_patrol")]
#[command(about = "Simulate a guard patrol and count loop-inducing obstructions")]
struct Cli {
    /// Layout file (defaults to [input] path from the config)
    input: Option<PathBuf>,

    /// Configuration file (defaults to ./guard_patrol.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How obstruction trials share the grid
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Which cells are tried as obstructions
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Worker threads for the parallel strategy
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Read the layout from the clipboard instead of a file
    #[arg(long)]
    from_clipboard: bool,

    /// Print the patrol trail after the results
    #[arg(long)]
    show_trail: bool,

    /// Copy the patrol trail to the clipboard
    #[arg(long)]
    copy_trail: bool,

    /// Write a JSON report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the unobstructed patrol as a JSON event trace
    #[arg(long)]
    trace: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    InPlace,
    Parallel,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    AllOpen,
    PatrolPath,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = logging::init();
    let config = Config::load(cli.config.as_deref()).context("load configuration")?;
    if let Err(e) = log.apply_config(&config.logging.filter) {
        warn!(error = %e, "keeping default logging filter");
    }

    let mut options = config.search.options();
    if let Some(strategy) = cli.strategy {
        options.strategy = match strategy {
            StrategyArg::InPlace => Strategy::InPlace,
            StrategyArg::Parallel => Strategy::Parallel,
        };
    }
    if let Some(scope) = cli.scope {
        options.scope = match scope {
            ScopeArg::AllOpen => CandidateScope::AllOpen,
            ScopeArg::PatrolPath => CandidateScope::PatrolPath,
        };
    }
    if let Some(threads) = cli.threads {
        options.threads = Some(threads).filter(|&n| n > 0);
    }

    let text = if cli.from_clipboard {
        paste_from_clipboard().context("read layout from clipboard")?
    } else {
        let path = cli.input.clone().unwrap_or_else(|| PathBuf::from(&config.input.path));
        info!(path = %path.display(), "reading layout");
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?
    };

    let started = Instant::now();
    let mut layout = Layout::parse(&text).context("parse layout")?;
    let start = layout.start;

    let coverage = coverage_run(&layout.grid, start)?;
    if coverage.terminal == Terminal::Looping {
        warn!("guard never leaves the grid; visited count covers the loop only");
    }

    let search = run_search(&mut layout.grid, start, &options)?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    println!("Part 1: {}", coverage.visited_count());
    println!("Part 2: {}", search.count());

    let show_trail = cli.show_trail || config.output.show_trail;
    let copy_trail = cli.copy_trail || config.output.copy_trail;
    if show_trail || copy_trail {
        let trail = render_trail(&layout.grid, start, &coverage.poses, &search.loop_obstructions);
        if show_trail {
            println!("\n{}", trail);
        }
        if copy_trail {
            copy_to_clipboard(&trail).context("copy trail to clipboard")?;
        }
    }

    if let Some(path) = cli.report.or_else(|| config.output.report_path.map(PathBuf::from)) {
        let report = SolveReport::new(&layout.grid, start, &coverage, &search, options.strategy, elapsed_ms);
        report
            .save_to_file(&path)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    if let Some(path) = cli.trace.or_else(|| config.output.trace_path.map(PathBuf::from)) {
        let log = TraceLog::record(&layout.grid, start, None)?;
        log.save_to_file(&path)
            .with_context(|| format!("write trace {}", path.display()))?;
        info!(path = %path.display(), summary = %log.summary(), "trace written");
    }

    Ok(())
}
