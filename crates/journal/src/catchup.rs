//! Catch-up run: load checkpoint, plan every tracked feed, apply, persist
//!
//! Fetching state documents and applying diffs are injected collaborators.
//! Every state document is fetched and parsed before the first apply, so a
//! planning failure aborts the run with no side effects.

use crate::planner::{CatchupPlanner, FeedPlan, PlanWarning};
use crate::store::CheckpointStore;
use anyhow::{Context, Result};
use replicat_core::{path, Feed, PartitionedPath, SequenceNumber};

/// Source of remote state documents
pub trait StateSource {
    /// Raw text of `feed`'s head state document
    fn fetch_state(&self, feed: Feed) -> Result<String>;
}

/// Fetches and applies one diff
pub trait DiffApplier {
    /// Fetch and apply `seq` of `feed`
    ///
    /// Returning `Ok` confirms the sequence is fully applied; the checkpoint
    /// is advanced past it right after.
    fn apply(&mut self, feed: Feed, seq: SequenceNumber, location: &DiffLocation) -> Result<()>;
}

/// Where a diff lives relative to the replication base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLocation {
    /// Published partition of the sequence
    pub partition: PartitionedPath,
    /// `<feed>/<aaa>/<bbb>/<ccc><ext>`
    pub relative_path: String,
}

impl DiffLocation {
    /// Location of `seq` in `feed`
    pub fn new(feed: Feed, seq: SequenceNumber) -> Self {
        let partition = feed.partition(seq);
        let relative_path = path::build_path(feed.dir_name(), &partition, feed.data_extension());
        Self {
            partition,
            relative_path,
        }
    }

    /// Absolute URL below `base`
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.relative_path)
    }
}

/// Run configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Plan and report only; apply nothing and leave the checkpoint alone
    pub dry_run: bool,
    /// Maximum sequences applied per feed in this run
    pub limit_per_feed: Option<u64>,
}

/// Outcome for one feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedReport {
    pub feed: Feed,
    /// Position before the run
    pub from: SequenceNumber,
    /// Position after the run
    pub to: SequenceNumber,
    /// Remote head seen during planning
    pub latest: SequenceNumber,
    pub applied: u64,
    pub warning: Option<PlanWarning>,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub feeds: Vec<FeedReport>,
    pub dry_run: bool,
}

impl RunReport {
    /// Total sequences applied (or that would be applied, for a dry run)
    pub fn total_applied(&self) -> u64 {
        self.feeds.iter().map(|f| f.applied).sum()
    }

    /// Feeds whose remote head went backwards
    pub fn regressions(&self) -> impl Iterator<Item = &FeedReport> {
        self.feeds.iter().filter(|f| f.warning.is_some())
    }
}

/// A planned run, ready to execute
#[derive(Debug, Clone)]
pub struct Catchup {
    planner: CatchupPlanner,
    plans: Vec<FeedPlan>,
}

impl Catchup {
    /// Load the checkpoint and plan every tracked feed
    pub fn prepare(
        feeds: &[Feed],
        store: &dyn CheckpointStore,
        source: &dyn StateSource,
    ) -> Result<Self> {
        // 1. Load checkpoint
        let planner = CatchupPlanner::load(feeds, store).context("Failed to load checkpoint")?;

        // 2. Fetch and parse every head before touching anything
        let mut plans = Vec::with_capacity(feeds.len());
        for &feed in planner.feeds() {
            let document = source
                .fetch_state(feed)
                .with_context(|| format!("Failed to fetch {} state", feed))?;
            let state = feed
                .parse_state(&document)
                .with_context(|| format!("Failed to parse {} state", feed))?;

            let plan = planner.plan(feed, state.sequence)?;
            if let Some(PlanWarning::Regression { current, latest }) = plan.warning {
                tracing::warn!(%feed, %current, %latest, "Remote head is behind local checkpoint");
            }
            plans.push(plan);
        }

        Ok(Self { planner, plans })
    }

    /// Per-feed plans in checkpoint order
    pub fn plans(&self) -> &[FeedPlan] {
        &self.plans
    }

    /// Checkpoint the plans were computed against
    pub fn planner(&self) -> &CatchupPlanner {
        &self.planner
    }

    /// Number of sequences a run with `options` will apply
    pub fn total(&self, options: &RunOptions) -> u64 {
        self.plans
            .iter()
            .map(|p| capped(p.len(), options.limit_per_feed))
            .sum()
    }

    /// Apply every planned sequence in order
    ///
    /// The checkpoint is advanced and saved after each confirmed apply, then
    /// saved once more at the end, even when nothing was applied.
    pub fn execute(
        self,
        store: &dyn CheckpointStore,
        applier: &mut dyn DiffApplier,
        options: RunOptions,
    ) -> Result<RunReport> {
        let Catchup { mut planner, plans } = self;
        let mut report = RunReport {
            feeds: Vec::with_capacity(plans.len()),
            dry_run: options.dry_run,
        };

        for plan in &plans {
            let budget = capped(plan.len(), options.limit_per_feed);
            let mut applied = 0u64;
            let mut position = plan.current;

            for seq in plan.sequences().take(budget as usize) {
                if !options.dry_run {
                    let location = DiffLocation::new(plan.feed, seq);
                    applier
                        .apply(plan.feed, seq, &location)
                        .with_context(|| format!("Failed to apply {} sequence {}", plan.feed, seq))?;
                    planner.advance(plan.feed, seq)?;
                    planner.save(store).context("Failed to save checkpoint")?;
                    tracing::info!(feed = %plan.feed, %seq, "Applied");
                }
                applied += 1;
                position = seq;
            }

            report.feeds.push(FeedReport {
                feed: plan.feed,
                from: plan.current,
                to: position,
                latest: plan.latest,
                applied,
                warning: plan.warning,
            });
        }

        if !options.dry_run {
            planner.save(store).context("Failed to save checkpoint")?;
        }

        Ok(report)
    }
}

/// Load, plan and apply in one call
pub fn run(
    feeds: &[Feed],
    store: &dyn CheckpointStore,
    source: &dyn StateSource,
    applier: &mut dyn DiffApplier,
    options: RunOptions,
) -> Result<RunReport> {
    Catchup::prepare(feeds, store, source)?.execute(store, applier, options)
}

fn capped(len: u64, limit: Option<u64>) -> u64 {
    limit.map_or(len, |limit| len.min(limit))
}
