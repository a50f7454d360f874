//! Configuration management command
//!
//! Provides CLI interface to view configuration.

use crate::config::{self, LoadedConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// List all configuration values
pub fn run_list(loaded: &LoadedConfig) -> Result<()> {
    let config = &loaded.config;

    println!("{}", "Configuration".bold());
    match &loaded.source {
        Some(path) => println!("{}: {}\n", "Location".dimmed(), path.display().dimmed()),
        None => println!("{}: {}\n", "Location".dimmed(), "built-in defaults".dimmed()),
    }

    println!("{}", "[feed]".yellow());
    println!("  {} = {}", "base_url".cyan(), config.feed.base_url);
    let tracked: Vec<_> = config.feed.tracked.iter().map(|f| f.to_string()).collect();
    println!(
        "  {} = [{}] {}",
        "tracked".cyan(),
        tracked.join(", "),
        "(checkpoint field order)".dimmed()
    );

    println!("\n{}", "[storage]".yellow());
    println!(
        "  {} = {}",
        "checkpoint_file".cyan(),
        config.storage.checkpoint_file.display()
    );
    println!("  {} = {}", "mirror_dir".cyan(), config.storage.mirror_dir.display());
    println!("  {} = {}", "diff_dir".cyan(), config.storage.diff_dir.display());

    Ok(())
}

/// Show the user config file path and optionally create it
pub fn run_path(create: bool) -> Result<()> {
    let config_path =
        config::config_file_path().context("Could not determine config file path")?;

    if create && !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(&config_path, config::example_config())
            .context("Failed to write config file")?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else {
        println!("{}", config_path.display());
        if !config_path.exists() {
            println!("{}", "File does not exist. Use --create to create it.".yellow());
        }
    }

    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}
