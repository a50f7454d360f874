//! Record a sequence applied outside of `sync`

use crate::config::Config;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use replicat_core::{Feed, SequenceNumber};
use replicat_journal::{CatchupPlanner, CheckpointLock};

pub fn run(config: &Config, feed: Feed, seq: SequenceNumber) -> Result<()> {
    let store = util::checkpoint_store(config);
    util::require_checkpoint(&store)?;

    // Load, advance and save as one critical section
    let lock = CheckpointLock::acquire(&store.lock_path())?;
    let mut planner = CatchupPlanner::load(&config.feed.tracked, &store)
        .context("Failed to load checkpoint")?;
    planner.advance(feed, seq)?;
    planner.save(&store).context("Failed to save checkpoint")?;
    lock.release()?;

    println!("{} {} checkpoint now at {}", "✓".green(), feed, seq.to_string().yellow());
    Ok(())
}
