//! Replicat CLI - replicat command

use anyhow::Result;
use clap::{Parser, Subcommand};
use replicat_cli::{cmd, config};
use replicat_core::{Feed, SequenceNumber};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Replicat - keep a local copy of a replication feed caught up
#[derive(Parser)]
#[command(name = "replicat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./replicat.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local checkpoint
    Init {
        /// Last applied sequence per tracked feed, comma-separated in tracked order
        #[arg(long)]
        at: String,
        /// Overwrite an existing checkpoint
        #[arg(long)]
        force: bool,
    },
    /// Show checkpoint positions
    Status,
    /// Show which sequences are missing
    Plan {
        /// Sequences to list per feed
        #[arg(long, default_value = "5")]
        show: usize,
        /// Maximum sequences per feed to count
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Fetch and apply missing sequences from the mirror
    Sync {
        /// Plan and report only
        #[arg(long)]
        dry_run: bool,
        /// Maximum sequences per feed to apply in this run
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Record a sequence applied by an external tool
    Advance {
        /// Feed (minute, hour, day, changesets)
        feed: Feed,
        /// Sequence that was applied (must follow the checkpoint)
        seq: SequenceNumber,
    },
    /// Show the published paths of a sequence
    Path {
        /// Feed (minute, hour, day, changesets)
        feed: Feed,
        /// Sequence number
        seq: SequenceNumber,
    },
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List effective configuration
    List,
    /// Show the user config file path
    Path {
        /// Create the file from the example if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let load = || config::load(cli.config.as_deref());

    match cli.command {
        Commands::Init { at, force } => cmd::init::run(&load()?.config, &at, force),
        Commands::Status => cmd::status::run(&load()?),
        Commands::Plan { show, limit } => cmd::plan::run(&load()?.config, show, limit),
        Commands::Sync { dry_run, limit } => cmd::sync::run(&load()?.config, dry_run, limit),
        Commands::Advance { feed, seq } => cmd::advance::run(&load()?.config, feed, seq),
        Commands::Path { feed, seq } => cmd::path::run(&load()?.config, feed, seq),
        Commands::Config(ConfigCommands::List) => cmd::config::run_list(&load()?),
        // Neither needs a valid configuration
        Commands::Config(ConfigCommands::Path { create }) => cmd::config::run_path(create),
        Commands::Config(ConfigCommands::Example) => cmd::config::run_example(),
    }
}
