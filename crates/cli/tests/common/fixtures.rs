//! Test fixtures: a working directory with a config and a local mirror

use replicat_core::{path, Feed, SequenceNumber};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary project with `replicat.toml`, `mirror/` and `diffs/`
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Project tracking `feeds`, in checkpoint order
    pub fn new(feeds: &[Feed]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let tracked: Vec<_> = feeds.iter().map(|f| format!("\"{}\"", f)).collect();
        let config = format!(
            "[feed]\nbase_url = \"https://example.org/replication\"\ntracked = [{}]\n\n\
             [storage]\ncheckpoint_file = \"local-state.csv\"\nmirror_dir = \"mirror\"\ndiff_dir = \"diffs\"\n",
            tracked.join(", ")
        );
        std::fs::write(dir.path().join("replicat.toml"), config).expect("Failed to write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn mirror(&self) -> PathBuf {
        self.path().join("mirror")
    }

    pub fn checkpoint(&self) -> String {
        std::fs::read_to_string(self.path().join("local-state.csv"))
            .expect("Failed to read checkpoint")
    }

    /// Publish the head state document of `feed`
    pub fn set_head(&self, feed: Feed, head: u64) {
        let document = match feed {
            Feed::Changesets => format!("---\nlast_run: 2024-01-01 00:00:00 +00:00\nsequence: {}\n", head),
            _ => format!("#Mon Jan 01 00:00:00 UTC 2024\nsequenceNumber={}\ntimestamp=2024-01-01T00\\:00\\:00Z\n", head),
        };
        let dir = self.mirror().join(feed.dir_name());
        std::fs::create_dir_all(&dir).expect("Failed to create feed dir");
        std::fs::write(dir.join(feed.state_document()), document).expect("Failed to write state");
    }

    /// Publish diffs `from..=to` of `feed` at their partitioned paths
    pub fn publish(&self, feed: Feed, from: u64, to: u64) {
        for n in from..=to {
            let seq = SequenceNumber::new(n);
            let target = path::diff_local_path(&self.mirror(), feed, seq);
            std::fs::create_dir_all(target.parent().expect("diff path has a parent"))
                .expect("Failed to create partition dir");
            std::fs::write(&target, format!("diff {} {}", feed, n)).expect("Failed to write diff");
        }
    }
}
