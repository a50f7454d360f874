//! Local checkpoint record
//!
//! Persisted as a single line of comma-separated sequence numbers, one per
//! tracked feed (`day,hour,minute,changeset` when all four are tracked).

use replicat_core::{Feed, SequenceNumber};
use smallvec::SmallVec;
use std::fmt;

/// Last fully applied sequence number of every tracked feed
///
/// Field order and count are preserved exactly between load and save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCheckpoint {
    positions: SmallVec<[SequenceNumber; 4]>,
}

/// Checkpoint failures
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// Persisted record does not parse into the expected integer tuple
    #[error("corrupt checkpoint: {reason}")]
    Corrupt { reason: String },

    /// Advance would skip or repeat a sequence
    #[error("cannot advance {feed} checkpoint from {current} to {requested}: sequences must be applied in order")]
    NonContiguous {
        feed: Feed,
        current: SequenceNumber,
        requested: SequenceNumber,
    },

    /// Feed is not part of the checkpoint layout
    #[error("feed {0} is not tracked by this checkpoint")]
    UntrackedFeed(Feed),

    /// Underlying storage failure
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckpointError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }
}

impl LocalCheckpoint {
    /// Create a checkpoint from positions in layout order
    pub fn new(positions: impl IntoIterator<Item = SequenceNumber>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    /// Checkpoint of a single tracked feed
    pub fn single(seq: SequenceNumber) -> Self {
        Self::new([seq])
    }

    /// Joint checkpoint of the day, hour, minute and changeset feeds
    pub fn joint(
        day: SequenceNumber,
        hour: SequenceNumber,
        minute: SequenceNumber,
        changesets: SequenceNumber,
    ) -> Self {
        Self::new([day, hour, minute, changesets])
    }

    /// Parse the persisted `n[,n...]` form
    ///
    /// Surrounding whitespace and a trailing newline are tolerated. Every
    /// field must be a non-empty run of ASCII digits.
    pub fn parse(record: &str) -> Result<Self, CheckpointError> {
        let record = record.trim();
        if record.is_empty() {
            return Err(CheckpointError::corrupt("empty record"));
        }

        let mut positions = SmallVec::new();
        for (idx, field) in record.split(',').enumerate() {
            let field = field.trim();
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CheckpointError::corrupt(format!(
                    "field {} is not a sequence number: '{}'",
                    idx + 1,
                    field
                )));
            }
            let seq = field.parse::<SequenceNumber>().map_err(|e| {
                CheckpointError::corrupt(format!("field {} out of range: {}", idx + 1, e))
            })?;
            positions.push(seq);
        }

        Ok(Self { positions })
    }

    /// Persisted form, without a trailing newline
    pub fn serialize(&self) -> String {
        self.positions
            .iter()
            .map(|seq| seq.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Positions in layout order
    pub fn positions(&self) -> &[SequenceNumber] {
        &self.positions
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the checkpoint has no fields
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position at `index`
    pub fn get(&self, index: usize) -> Option<SequenceNumber> {
        self.positions.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, seq: SequenceNumber) {
        self.positions[index] = seq;
    }
}

impl fmt::Display for LocalCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
