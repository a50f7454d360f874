//! Catch-up planning between a local checkpoint and a remote head

use crate::checkpoint::{CheckpointError, LocalCheckpoint};
use crate::store::{self, CheckpointStore};
use replicat_core::{Feed, SequenceNumber};
use smallvec::SmallVec;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;

/// Lazy, forward-only sequence of missing sequence numbers
///
/// Holds no resources; it may be cloned, consumed more than once via clones,
/// or dropped part-way.
#[derive(Debug, Clone)]
pub struct Missing {
    range: RangeInclusive<u64>,
}

/// Sequences `current + 1 ..= latest`
///
/// Empty when `latest <= current`, which covers both "already caught up" and
/// a remote head that went backwards.
pub fn missing(current: SequenceNumber, latest: SequenceNumber) -> Missing {
    let range = match current.get().checked_add(1) {
        Some(start) if start <= latest.get() => start..=latest.get(),
        _ => 1..=0,
    };
    Missing { range }
}

impl Missing {
    /// Number of sequences not yet yielded
    pub fn remaining(&self) -> u64 {
        if self.range.is_empty() {
            0
        } else {
            self.range.end() - self.range.start() + 1
        }
    }
}

impl Iterator for Missing {
    type Item = SequenceNumber;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(SequenceNumber::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Missing {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range.next_back().map(SequenceNumber::new)
    }
}

impl FusedIterator for Missing {}

/// Non-fatal anomaly found while planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanWarning {
    /// Remote head is behind the local checkpoint
    Regression {
        current: SequenceNumber,
        latest: SequenceNumber,
    },
}

/// Catch-up plan for one feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPlan {
    pub feed: Feed,
    /// Last applied sequence
    pub current: SequenceNumber,
    /// Remote head
    pub latest: SequenceNumber,
    pub warning: Option<PlanWarning>,
}

impl FeedPlan {
    /// Sequences still to fetch and apply, in order
    pub fn sequences(&self) -> Missing {
        missing(self.current, self.latest)
    }

    /// Number of sequences to apply
    pub fn len(&self) -> u64 {
        self.current.distance_to(self.latest)
    }

    /// Whether the feed is already caught up
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owns the local checkpoint during a run and plans against remote heads
#[derive(Debug, Clone)]
pub struct CatchupPlanner {
    feeds: SmallVec<[Feed; 4]>,
    checkpoint: LocalCheckpoint,
}

impl CatchupPlanner {
    /// Planner over `checkpoint`, whose fields follow the order of `feeds`
    pub fn new(feeds: &[Feed], checkpoint: LocalCheckpoint) -> Result<Self, CheckpointError> {
        if checkpoint.len() != feeds.len() {
            return Err(CheckpointError::Corrupt {
                reason: format!(
                    "expected {} fields ({}), found {}",
                    feeds.len(),
                    feed_list(feeds),
                    checkpoint.len()
                ),
            });
        }

        Ok(Self {
            feeds: feeds.iter().copied().collect(),
            checkpoint,
        })
    }

    /// Load the checkpoint from `source` and build a planner over it
    pub fn load(feeds: &[Feed], source: &dyn CheckpointStore) -> Result<Self, CheckpointError> {
        let checkpoint = store::load_checkpoint(source)?;
        tracing::debug!(checkpoint = %checkpoint, "Loaded checkpoint");
        Self::new(feeds, checkpoint)
    }

    /// Persist the current checkpoint to `sink`
    pub fn save(&self, sink: &dyn CheckpointStore) -> Result<(), CheckpointError> {
        store::save_checkpoint(sink, &self.checkpoint)
    }

    /// Tracked feeds in checkpoint order
    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    /// Checkpoint as currently advanced
    pub fn checkpoint(&self) -> &LocalCheckpoint {
        &self.checkpoint
    }

    /// Give up ownership of the checkpoint
    pub fn into_checkpoint(self) -> LocalCheckpoint {
        self.checkpoint
    }

    /// Last applied sequence of `feed`
    pub fn current(&self, feed: Feed) -> Result<SequenceNumber, CheckpointError> {
        let index = self.index_of(feed)?;
        Ok(self.checkpoint.positions()[index])
    }

    /// Plan the catch-up of `feed` to the remote head `latest`
    pub fn plan(&self, feed: Feed, latest: SequenceNumber) -> Result<FeedPlan, CheckpointError> {
        let current = self.current(feed)?;
        let warning = (latest < current).then_some(PlanWarning::Regression { current, latest });

        let plan = FeedPlan {
            feed,
            current,
            latest,
            warning,
        };
        tracing::debug!(%feed, %current, %latest, missing = plan.len(), "Planned catch-up");
        Ok(plan)
    }

    /// Record that `seq` of `feed` has been applied
    ///
    /// Only the sequence directly after the current position is accepted.
    pub fn advance(&mut self, feed: Feed, seq: SequenceNumber) -> Result<(), CheckpointError> {
        let index = self.index_of(feed)?;
        let current = self.checkpoint.positions()[index];
        if current.next() != Some(seq) {
            return Err(CheckpointError::NonContiguous {
                feed,
                current,
                requested: seq,
            });
        }

        self.checkpoint.set(index, seq);
        Ok(())
    }

    fn index_of(&self, feed: Feed) -> Result<usize, CheckpointError> {
        self.feeds
            .iter()
            .position(|&f| f == feed)
            .ok_or(CheckpointError::UntrackedFeed(feed))
    }
}

fn feed_list(feeds: &[Feed]) -> String {
    feeds
        .iter()
        .map(|f| f.dir_name())
        .collect::<Vec<_>>()
        .join(",")
}
