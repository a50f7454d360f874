//! Print the published paths of one sequence

use crate::config::Config;
use anyhow::Result;
use owo_colors::OwoColorize;
use replicat_core::{path, Feed, SequenceNumber};

pub fn run(config: &Config, feed: Feed, seq: SequenceNumber) -> Result<()> {
    let base = &config.feed.base_url;
    let partition = feed.partition(seq);

    println!("{}:  {}", "Partition".bold(), partition);
    if feed.offsets_leaf() {
        println!("{}", "           (changeset feed: leaf published one past the sequence)".dimmed());
    }
    println!("{}:       {}", "Diff".bold(), path::diff_url(base, feed, seq));
    println!("{}:      {}", "State".bold(), path::state_file_url(base, feed, seq));
    println!(
        "{}:     {}",
        "Mirror".bold(),
        path::diff_local_path(&config.storage.mirror_dir, feed, seq).display()
    );
    println!("{}:       {}", "Head".bold(), path::state_url(base, feed));

    Ok(())
}
