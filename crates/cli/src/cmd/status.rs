//! Show checkpoint positions

use crate::config::LoadedConfig;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use replicat_core::path;
use replicat_journal::CatchupPlanner;

pub fn run(loaded: &LoadedConfig) -> Result<()> {
    let config = &loaded.config;
    let store = util::checkpoint_store(config);
    util::require_checkpoint(&store)?;

    let planner = CatchupPlanner::load(&config.feed.tracked, &store)
        .context("Failed to load checkpoint")?;

    println!("{}", "Replication Status".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    match &loaded.source {
        Some(source) => println!("Config:        {}", source.display()),
        None => println!("Config:        {}", "defaults".dimmed()),
    }
    println!("Checkpoint:    {}", store.path().display().to_string().cyan());
    println!("Base URL:      {}", config.feed.base_url);
    if store.lock_path().exists() {
        println!("Lock:          {}", "held (catch-up in progress?)".yellow());
    }
    println!();

    println!("Applied through:");
    for &feed in planner.feeds() {
        let seq = planner.current(feed)?;
        println!(
            "  {:<11} {:>10}  {}",
            feed.to_string(),
            seq.to_string().yellow(),
            path::state_file_url(&config.feed.base_url, feed, seq).dimmed()
        );
    }

    Ok(())
}
