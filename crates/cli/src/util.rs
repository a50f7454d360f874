//! Shared utilities for CLI commands

use crate::config::Config;
use owo_colors::OwoColorize;
use replicat_journal::{FeedPlan, FileCheckpointStore, PlanWarning};

/// Checkpoint store configured for this run
pub fn checkpoint_store(config: &Config) -> FileCheckpointStore {
    FileCheckpointStore::new(&config.storage.checkpoint_file)
}

/// Fail early with a helpful message when the checkpoint was never created
pub fn require_checkpoint(store: &FileCheckpointStore) -> anyhow::Result<()> {
    if !store.exists() {
        anyhow::bail!(
            "No checkpoint at {} (create one with 'replicat init --at <seq,...>')",
            store.path().display()
        );
    }
    Ok(())
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// One-line summary of a feed plan
pub fn describe_plan(plan: &FeedPlan) -> String {
    match plan.warning {
        Some(PlanWarning::Regression { current, latest }) => format!(
            "{:<11} {} -> {}  {}",
            plan.feed.to_string(),
            current,
            latest,
            "remote head is behind checkpoint".yellow()
        ),
        None if plan.is_empty() => format!(
            "{:<11} {}  {}",
            plan.feed.to_string(),
            plan.current,
            "up to date".green()
        ),
        None => format!(
            "{:<11} {} -> {}  {} missing",
            plan.feed.to_string(),
            plan.current,
            plan.latest,
            plan.len().to_string().cyan()
        ),
    }
}
