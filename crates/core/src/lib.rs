//! Replicat Core - sequence-number model of replication feeds
//!
//! This crate provides:
//! - Sequence numbers and feed identifiers
//! - State document parsing (`key=value` and `key: value` layouts)
//! - Three-level sequence partitioning
//! - Fetch URL and local path construction

pub mod feed;
pub mod partition;
pub mod path;
pub mod sequence;
pub mod state;

// Re-export main types for convenience
pub use feed::{Feed, UnknownFeed};
pub use partition::{partition, partition_changeset, PartitionedPath};
pub use path::{build_path, DEFAULT_BASE_URL};
pub use sequence::SequenceNumber;
pub use state::{FeedState, ParseError, StateFormat};
