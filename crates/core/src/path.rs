//! Fetch URL and local path construction
//!
//! Paths follow the upstream replication layout:
//! ```text
//! <base>/<feed>/state.txt
//! <base>/<feed>/000/004/301.osc.gz
//! <base>/<feed>/000/004/301.state.txt
//! ```

use crate::{Feed, PartitionedPath, SequenceNumber};
use std::path::{Path, PathBuf};

/// Default upstream replication root
pub const DEFAULT_BASE_URL: &str = "https://planet.openstreetmap.org/replication";

/// Extension of the per-sequence state files
pub const STATE_FILE_EXTENSION: &str = ".state.txt";

/// Join `base` and the zero-padded partition segments, appending `extension`
/// to the last segment
///
/// Exactly one `/` separates `base` from the segments even if `base` already
/// ends with one.
pub fn build_path(base: &str, partitioned: &PartitionedPath, extension: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("{}{}", partitioned, extension)
    } else {
        format!("{}/{}{}", base, partitioned, extension)
    }
}

/// Filesystem flavour of [`build_path`]
pub fn build_local_path(root: &Path, partitioned: &PartitionedPath, extension: &str) -> PathBuf {
    let [top, mid, leaf] = partitioned.segments();
    root.join(top).join(mid).join(format!("{}{}", leaf, extension))
}

/// Root of one feed below the replication base
pub fn feed_url(base: &str, feed: Feed) -> String {
    format!("{}/{}", base.trim_end_matches('/'), feed.dir_name())
}

/// URL of a feed's head state document
pub fn state_url(base: &str, feed: Feed) -> String {
    format!("{}/{}", feed_url(base, feed), feed.state_document())
}

/// URL of the diff file for `seq`
pub fn diff_url(base: &str, feed: Feed, seq: SequenceNumber) -> String {
    build_path(&feed_url(base, feed), &feed.partition(seq), feed.data_extension())
}

/// URL of the per-sequence state file for `seq`
pub fn state_file_url(base: &str, feed: Feed, seq: SequenceNumber) -> String {
    build_path(&feed_url(base, feed), &feed.partition(seq), STATE_FILE_EXTENSION)
}

/// Path of the diff file for `seq` inside a local copy of the replication tree
pub fn diff_local_path(root: &Path, feed: Feed, seq: SequenceNumber) -> PathBuf {
    build_local_path(
        &root.join(feed.dir_name()),
        &feed.partition(seq),
        feed.data_extension(),
    )
}

/// File name a fetched diff is stored under once applied (`<seq><ext>`)
pub fn applied_file_name(feed: Feed, seq: SequenceNumber) -> String {
    format!("{}{}", seq, feed.data_extension())
}
