//! Show what a catch-up would fetch

use crate::config::Config;
use crate::mirror::{MirrorApplier, MirrorStateSource};
use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use replicat_journal::{Catchup, DiffLocation, RunOptions};

pub fn run(config: &Config, show: usize, limit: Option<u64>) -> Result<()> {
    let store = util::checkpoint_store(config);
    util::require_checkpoint(&store)?;

    let source = MirrorStateSource::new(&config.storage.mirror_dir);
    let catchup = Catchup::prepare(&config.feed.tracked, &store, &source)?;
    let destinations = MirrorApplier::new(&config.storage.mirror_dir, &config.storage.diff_dir);

    println!("{}", "Catch-up Plan".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    for plan in catchup.plans() {
        println!("{}", util::describe_plan(plan));

        let mut sequences = plan.sequences();
        for seq in sequences.by_ref().take(show) {
            let location = DiffLocation::new(plan.feed, seq);
            println!(
                "    {:>10}  {}  {} {}",
                seq,
                location.url(&config.feed.base_url),
                "->".dimmed(),
                destinations.destination(plan.feed, seq).display()
            );
        }
        let rest = sequences.remaining();
        if show > 0 && rest > 0 {
            println!("    {}", format!("... and {} more", rest).dimmed());
        }
    }

    let options = RunOptions {
        dry_run: true,
        limit_per_feed: limit,
    };
    println!();
    println!(
        "Total: {} sequences to apply",
        catchup.total(&options).to_string().cyan()
    );

    Ok(())
}
