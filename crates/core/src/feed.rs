//! Replication feed identifiers and their publishing conventions

use crate::partition::{self, PartitionedPath};
use crate::state::{self, FeedState, ParseError, StateFormat};
use crate::SequenceNumber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A remote feed publishing an increasing sequence of diff files
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    /// One diff per minute
    Minute,
    /// One diff per hour
    Hour,
    /// One diff per day
    Day,
    /// Changeset metadata diffs
    Changesets,
}

impl Feed {
    /// All known feeds, in the order used by the joint four-field checkpoint
    pub const JOINT_ORDER: [Feed; 4] = [Feed::Day, Feed::Hour, Feed::Minute, Feed::Changesets];

    /// Directory of this feed below the replication base URL
    pub fn dir_name(self) -> &'static str {
        match self {
            Feed::Minute => "minute",
            Feed::Hour => "hour",
            Feed::Day => "day",
            Feed::Changesets => "changesets",
        }
    }

    /// File name of the head state document
    pub fn state_document(self) -> &'static str {
        match self {
            Feed::Changesets => "state.yaml",
            _ => "state.txt",
        }
    }

    /// Textual layout of the head state document
    pub fn state_format(self) -> StateFormat {
        match self {
            Feed::Changesets => StateFormat::Colon,
            _ => StateFormat::Equals,
        }
    }

    /// Extension of the published diff files
    pub fn data_extension(self) -> &'static str {
        match self {
            Feed::Changesets => ".osm.gz",
            _ => ".osc.gz",
        }
    }

    /// Whether diff paths carry the changeset publisher's off-by-one leaf
    pub fn offsets_leaf(self) -> bool {
        matches!(self, Feed::Changesets)
    }

    /// Parse this feed's head state document
    pub fn parse_state(self, document: &str) -> Result<FeedState, ParseError> {
        state::parse(document, self.state_format())
    }

    /// Partition a sequence number the way this feed publishes it
    pub fn partition(self, seq: SequenceNumber) -> PartitionedPath {
        if self.offsets_leaf() {
            partition::partition_changeset(seq)
        } else {
            partition::partition(seq)
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Error returned when a feed name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed '{0}' (expected minute, hour, day or changesets)")]
pub struct UnknownFeed(pub String);

impl FromStr for Feed {
    type Err = UnknownFeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minute" => Ok(Feed::Minute),
            "hour" => Ok(Feed::Hour),
            "day" => Ok(Feed::Day),
            "changesets" | "changeset" => Ok(Feed::Changesets),
            _ => Err(UnknownFeed(s.to_string())),
        }
    }
}
