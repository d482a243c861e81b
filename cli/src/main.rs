//! Switchyard CLI - reads a machine manual and prints the fewest presses per
//! machine.
//!
//! ```text
//! main() -> load config -> parse_manual(file) -> report::run(mode)
//!                                                   |
//!                                                   v
//!                         ReachabilitySearcher | TargetOptimizer
//! ```
//!
//! Results go to stdout; logs go to stderr (or `--log-file`).

mod report;

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use report::Mode;
use switchyard_engine::{SolverConfig, TargetOptimizer, parse_manual};

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Find the fewest presses that bring each machine to its target")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Seed for the counter optimizer; overrides config and SWITCHYARD_SEED
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Config file to use instead of ~/.switchyard/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Minimum switch presses to light each lamp diagram
    Toggle {
        /// Manual with one machine per line
        file: PathBuf,
    },
    /// Minimum button presses to reach each counter target list
    Counter {
        /// Manual with one machine per line
        file: PathBuf,
    },
    /// Both of the above
    Solve {
        /// Manual with one machine per line
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file, init_warnings) = match log_file {
        Some(path) => open_log_file(path),
        None => (None, Vec::new()),
    };

    if let Some(file) = file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
    // Non-empty only when the log file could not be opened.
    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn open_log_file(path: &Path) -> (Option<fs::File>, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warnings.push(format!(
            "Failed to create log dir {}: {e}",
            parent.display()
        ));
        return (None, warnings);
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => (Some(file), warnings),
        Err(e) => {
            warnings.push(format!("Failed to open log file {}: {e}", path.display()));
            (None, warnings)
        }
    }
}

fn load_config(cli: &Cli) -> Result<SolverConfig> {
    let config = match &cli.config {
        Some(path) => SolverConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        // A broken default config is already logged; fall back to defaults.
        None => SolverConfig::load().ok().flatten().unwrap_or_default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_file.as_deref());

    let config = load_config(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    let (mode, file) = match &cli.command {
        Commands::Toggle { file } => (Mode::Toggle, file),
        Commands::Counter { file } => (Mode::Counter, file),
        Commands::Solve { file } => (Mode::Both, file),
    };

    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read manual {}", file.display()))?;
    let machines = parse_manual(&text)
        .with_context(|| format!("failed to parse manual {}", file.display()))?;
    tracing::info!(machines = machines.len(), "manual parsed");

    let optimizer = TargetOptimizer::new(config);
    let mut stdout = io::stdout().lock();
    let summary = report::run(&machines, mode, &optimizer, &mut stdout)?;
    stdout.flush()?;

    if let Some(tally) = summary.toggle {
        tracing::info!(solved = tally.solved, unreachable = tally.failed, "toggle pass done");
    }
    if let Some(tally) = summary.counter
        && tally.failed > 0
    {
        tracing::warn!(unsolved = tally.failed, "some counter systems were not solved");
    }

    Ok(())
}
