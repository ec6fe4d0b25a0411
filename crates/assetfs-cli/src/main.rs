//! assetfs binary
//!
//! Snapshots a host directory into an asset source and browses it through
//! the read-only asset filesystem.
//!
//! ## Usage
//!
//! ```bash
//! assetfs --root ./public ls css
//! assetfs --root ./public cat js/app.js --offset -20 --whence end
//! assetfs --root ./public stat css/site.css
//! assetfs --root ./public tree
//! ```

mod commands;
mod config;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use assetfs::{AssetFs, MemorySource, Whence};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "assetfs", version, about = "Browse a directory as a read-only asset filesystem")]
struct Cli {
    /// Config file (default: ./assetfs.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory to snapshot (overrides `root` from the config file)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = "")]
        path: String,
        /// Maximum entries; negative lists everything
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        limit: Option<isize>,
    },
    /// Print file content
    Cat {
        path: String,
        /// Seek offset applied before reading
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
        /// Seek origin: start, current or end
        #[arg(long, default_value_t = Whence::Start)]
        whence: Whence,
        /// Stop after this many bytes
        #[arg(long)]
        length: Option<u64>,
    },
    /// Show entry metadata
    Stat { path: String },
    /// Print the directory hierarchy
    Tree {
        #[arg(default_value = "")]
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("assetfs: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::discover(cli.config.as_deref())?;
    init_tracing(config.log.as_deref());

    let root = cli
        .root
        .or(config.root.clone())
        .context("no asset root given (use --root or set `root` in the config file)")?;
    let source = MemorySource::from_dir(&root)
        .with_context(|| format!("failed to snapshot {}", root.display()))?;
    debug!(root = %root.display(), assets = source.len(), "loaded asset source");

    let fs = AssetFs::new(source);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Ls { path, limit } => {
            commands::ls(&fs, &path, limit.unwrap_or(config.list_limit), &mut out)
        }
        Command::Cat {
            path,
            offset,
            whence,
            length,
        } => commands::cat(&fs, &path, offset, whence, length, &mut out),
        Command::Stat { path } => commands::stat(&fs, &path, &mut out),
        Command::Tree { path } => commands::tree(&fs, &path, &mut out),
    }
}

fn init_tracing(default_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or("warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
