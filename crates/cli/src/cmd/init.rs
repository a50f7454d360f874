//! Create the local checkpoint

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use replicat_journal::{save_checkpoint, CatchupPlanner, CheckpointLock, LocalCheckpoint};

pub fn run(config: &Config, at: &str, force: bool) -> Result<()> {
    let store = util::checkpoint_store(config);

    // 1. Lock first so the existence check and the write are one critical section
    let lock = CheckpointLock::acquire(&store.lock_path())?;

    // 2. Refuse to clobber an existing checkpoint
    if store.exists() && !force {
        anyhow::bail!(
            "Checkpoint already exists at {} (use --force to overwrite)",
            store.path().display()
        );
    }

    // 3. Parse and check against the tracked feeds
    let checkpoint = LocalCheckpoint::parse(at).context("Invalid --at value")?;
    let planner = CatchupPlanner::new(&config.feed.tracked, checkpoint)
        .context("--at must give one sequence per tracked feed")?;

    // 4. Persist
    save_checkpoint(&store, planner.checkpoint()).context("Failed to write checkpoint")?;
    lock.release()?;

    println!(
        "{} Created checkpoint at {}",
        "✓".green(),
        store.path().display()
    );
    for (feed, seq) in planner.feeds().iter().zip(planner.checkpoint().positions()) {
        println!("  {:<11} {}", feed.to_string(), seq);
    }

    Ok(())
}
