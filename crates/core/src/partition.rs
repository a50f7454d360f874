//! Three-level partitioning of sequence numbers
//!
//! Feeds publish sequence `N` under `aaa/bbb/ccc` where
//! `N = aaa * 1_000_000 + bbb * 1_000 + ccc`. The client derives the same
//! partition so its paths match the server's byte for byte.

use crate::SequenceNumber;
use std::fmt;

/// `(top, mid, leaf)` decomposition of a sequence number
///
/// Every component is in `0..=999` for sequences below one billion, except
/// the leaf of [`partition_changeset`] which may reach 1000.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct PartitionedPath {
    /// Millions
    pub top: u64,
    /// Thousands
    pub mid: u64,
    /// Units
    pub leaf: u64,
}

impl PartitionedPath {
    /// Rebuild the sequence number `top * 1_000_000 + mid * 1_000 + leaf`
    pub fn reconstruct(&self) -> SequenceNumber {
        SequenceNumber::new(self.top * 1_000_000 + self.mid * 1_000 + self.leaf)
    }

    /// Zero-padded 3-digit path segments
    pub fn segments(&self) -> [String; 3] {
        [
            format!("{:03}", self.top),
            format!("{:03}", self.mid),
            format!("{:03}", self.leaf),
        ]
    }
}

impl fmt::Display for PartitionedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}/{:03}/{:03}", self.top, self.mid, self.leaf)
    }
}

/// Split a sequence number into its published partition
pub fn partition(seq: SequenceNumber) -> PartitionedPath {
    let seq = seq.get();
    let leaf = seq % 1_000;
    let intermediate = (seq - leaf) % 1_000_000;
    let mid = intermediate / 1_000;
    let top = (seq - intermediate - leaf) / 1_000_000;

    PartitionedPath { top, mid, leaf }
}

/// Partition for the changeset feed
///
/// The changeset publisher stores sequence `N` one leaf further than the
/// other feeds. The leaf is bumped without carrying into `mid`, so a leaf of
/// 999 becomes 1000.
pub fn partition_changeset(seq: SequenceNumber) -> PartitionedPath {
    let mut path = partition(seq);
    path.leaf += 1;
    path
}
