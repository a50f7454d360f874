//! Local mirror collaborators
//!
//! A mirror is a directory laid out like the remote replication tree:
//! ```text
//! <mirror>/minute/state.txt
//! <mirror>/minute/005/893/142.osc.gz
//! <mirror>/minute/005/893/142.state.txt
//! <mirror>/changesets/state.yaml
//! ```

use anyhow::{Context, Result};
use replicat_core::{path, Feed, SequenceNumber};
use replicat_journal::store::atomic_write;
use replicat_journal::{DiffApplier, DiffLocation, StateSource};
use std::path::{Path, PathBuf};

/// Reads head state documents from a mirror
#[derive(Debug, Clone)]
pub struct MirrorStateSource {
    root: PathBuf,
}

impl MirrorStateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of `feed`'s head state document
    pub fn state_path(&self, feed: Feed) -> PathBuf {
        self.root.join(feed.dir_name()).join(feed.state_document())
    }
}

impl StateSource for MirrorStateSource {
    fn fetch_state(&self, feed: Feed) -> Result<String> {
        let path = self.state_path(feed);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state document {}", path.display()))
    }
}

/// Totals of a mirror apply session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub files: u64,
    pub bytes: u64,
}

/// Copies diffs out of a mirror into `<diff_dir>/<feed>/<seq><ext>`
///
/// The per-sequence state file is copied alongside when the mirror has one.
#[derive(Debug)]
pub struct MirrorApplier {
    root: PathBuf,
    diff_dir: PathBuf,
    stats: ApplyStats,
}

impl MirrorApplier {
    pub fn new(root: impl Into<PathBuf>, diff_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            diff_dir: diff_dir.into(),
            stats: ApplyStats::default(),
        }
    }

    /// Files and bytes copied so far
    pub fn stats(&self) -> ApplyStats {
        self.stats
    }

    /// Destination of an applied diff
    pub fn destination(&self, feed: Feed, seq: SequenceNumber) -> PathBuf {
        self.diff_dir
            .join(feed.dir_name())
            .join(path::applied_file_name(feed, seq))
    }

    fn copy(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let data =
            std::fs::read(src).with_context(|| format!("Failed to read {}", src.display()))?;
        atomic_write(dest, &data).with_context(|| format!("Failed to write {}", dest.display()))?;

        self.stats.files += 1;
        self.stats.bytes += data.len() as u64;
        Ok(())
    }
}

impl DiffApplier for MirrorApplier {
    fn apply(&mut self, feed: Feed, seq: SequenceNumber, location: &DiffLocation) -> Result<()> {
        let src = self.root.join(&location.relative_path);
        let dest = self.destination(feed, seq);
        self.copy(&src, &dest)?;

        let state_src = path::build_local_path(
            &self.root.join(feed.dir_name()),
            &location.partition,
            path::STATE_FILE_EXTENSION,
        );
        if state_src.is_file() {
            let state_dest = dest.with_file_name(format!("{}{}", seq, path::STATE_FILE_EXTENSION));
            self.copy(&state_src, &state_dest)?;
        }

        tracing::debug!(%feed, %seq, dest = %dest.display(), "Copied diff from mirror");
        Ok(())
    }
}
