//! Checkpoint journal and catch-up planning
//!
//! This crate provides:
//! - Local checkpoint record (one sequence number per tracked feed)
//! - Atomic checkpoint persistence behind a storage trait
//! - Cross-process checkpoint lock
//! - Catch-up planner (missing sequence ranges, regression detection)
//! - Explicit `run()` pipeline over injected fetch/apply collaborators

pub mod catchup;
pub mod checkpoint;
pub mod lock;
pub mod planner;
pub mod store;

// Re-exports
pub use catchup::{run, Catchup, DiffApplier, DiffLocation, RunOptions, RunReport, StateSource};
pub use checkpoint::{CheckpointError, LocalCheckpoint};
pub use lock::CheckpointLock;
pub use planner::{missing, CatchupPlanner, FeedPlan, Missing, PlanWarning};
pub use store::{
    load_checkpoint, save_checkpoint, CheckpointStore, FileCheckpointStore, MemoryCheckpointStore,
};

/// Result type for journal operations
pub type Result<T> = anyhow::Result<T>;
