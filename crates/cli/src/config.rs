//! Configuration file handling
//!
//! Lookup order: `--config <path>`, `./replicat.toml`, then
//! `<config dir>/replicat/config.toml`. Defaults apply when none exists.

use anyhow::{Context, Result};
use replicat_core::{Feed, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "replicat.toml";

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub storage: StorageConfig,
}

/// Which feeds are tracked and where they are published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Replication root, e.g. `https://planet.openstreetmap.org/replication`
    pub base_url: String,
    /// Tracked feeds; also the field order of the checkpoint record
    pub tracked: Vec<Feed>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tracked: Feed::JOINT_ORDER.to_vec(),
        }
    }
}

/// Local file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Checkpoint record
    pub checkpoint_file: PathBuf,
    /// Local copy of the replication tree used as the feed source
    pub mirror_dir: PathBuf,
    /// Where applied diffs are stored as `<feed>/<seq><ext>`
    pub diff_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            checkpoint_file: PathBuf::from("local-state.csv"),
            mirror_dir: PathBuf::from("mirror"),
            diff_dir: PathBuf::from("diffs"),
        }
    }
}

impl Config {
    /// Reject configurations the planner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.feed.base_url.trim().is_empty() {
            anyhow::bail!("feed.base_url must not be empty");
        }
        if self.feed.tracked.is_empty() {
            anyhow::bail!("feed.tracked must list at least one feed");
        }

        let mut seen = HashSet::new();
        for feed in &self.feed.tracked {
            if !seen.insert(feed) {
                anyhow::bail!("feed.tracked lists '{}' more than once", feed);
            }
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration and the file it came from, if any
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

/// Per-user config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("replicat").join("config.toml"))
}

/// Load configuration following the lookup order
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        return load_from(path).map(|config| LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
        });
    }

    let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), config_file_path()];
    for path in candidates.into_iter().flatten() {
        if path.is_file() {
            let config = load_from(&path)?;
            return Ok(LoadedConfig {
                config,
                source: Some(path),
            });
        }
    }

    tracing::debug!("No configuration file found, using defaults");
    Ok(LoadedConfig {
        config: Config::default(),
        source: None,
    })
}

/// Load configuration from `path`
pub fn load_from(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    Config::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# replicat configuration

[feed]
# Replication root; feeds live in <base_url>/<feed>/
base_url = "https://planet.openstreetmap.org/replication"
# Tracked feeds, in checkpoint field order
tracked = ["day", "hour", "minute", "changesets"]

[storage]
# Comma-separated last applied sequence per tracked feed
checkpoint_file = "local-state.csv"
# Local copy of the replication tree (<mirror_dir>/<feed>/state.txt, ...)
mirror_dir = "mirror"
# Applied diffs are stored here as <feed>/<sequence><ext>
diff_dir = "diffs"
"#
}
