//! Catch up every tracked feed from the mirror

use crate::config::Config;
use crate::mirror::{MirrorApplier, MirrorStateSource};
use crate::util;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use replicat_core::{Feed, SequenceNumber};
use replicat_journal::{Catchup, CheckpointLock, DiffApplier, DiffLocation, RunOptions};

/// Advances a progress bar after every successful apply
struct ProgressApplier<'a, A: DiffApplier> {
    inner: &'a mut A,
    bar: ProgressBar,
}

impl<A: DiffApplier> DiffApplier for ProgressApplier<'_, A> {
    fn apply(&mut self, feed: Feed, seq: SequenceNumber, location: &DiffLocation) -> Result<()> {
        self.bar.set_message(format!("{} {}", feed, seq));
        self.inner.apply(feed, seq, location)?;
        self.bar.inc(1);
        Ok(())
    }
}

pub fn run(config: &Config, dry_run: bool, limit: Option<u64>) -> Result<()> {
    let store = util::checkpoint_store(config);
    util::require_checkpoint(&store)?;

    // 1. Hold the checkpoint for the whole run
    let lock = CheckpointLock::acquire(&store.lock_path())?;

    // 2. Plan every feed before applying anything
    let source = MirrorStateSource::new(&config.storage.mirror_dir);
    let catchup = Catchup::prepare(&config.feed.tracked, &store, &source)?;
    let options = RunOptions {
        dry_run,
        limit_per_feed: limit,
    };

    for plan in catchup.plans() {
        println!("{}", util::describe_plan(plan));
    }

    // 3. Apply
    let mut applier = MirrorApplier::new(&config.storage.mirror_dir, &config.storage.diff_dir);
    let bar = ProgressBar::new(catchup.total(&options));
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );

    let result = {
        let mut progress = ProgressApplier {
            inner: &mut applier,
            bar: bar.clone(),
        };
        catchup.execute(&store, &mut progress, options)
    };
    bar.finish_and_clear();
    let report = result?;

    lock.release()?;

    // 4. Summary
    println!();
    if report.dry_run {
        println!(
            "{} {} sequences would be applied",
            "Dry run:".yellow(),
            report.total_applied()
        );
    } else if report.total_applied() == 0 {
        println!("{}", "Already up to date".dimmed());
    } else {
        let stats = applier.stats();
        println!(
            "{} Applied {} sequences ({} files, {})",
            "✓".green(),
            report.total_applied(),
            stats.files,
            util::format_size(stats.bytes)
        );
        for feed in report.feeds.iter().filter(|f| f.applied > 0) {
            println!("  {:<11} {} -> {}", feed.feed.to_string(), feed.from, feed.to);
        }
    }

    let regressions = report.regressions().count();
    if regressions > 0 {
        println!(
            "{}",
            format!("Warning: {} feed(s) report a head behind the checkpoint", regressions)
                .yellow()
        );
    }

    Ok(())
}
