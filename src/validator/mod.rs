//! Ordered checkpoint validator
//!
//! Consumes a timestamp-ordered ink stream and advances a single pointer
//! through a [`CheckpointPlan`](crate::checkpoint::CheckpointPlan). The batch
//! entry points are pure functions of (plan, config, samples): callers
//! re-invoke them on every ink delta with the full accumulated ink.
//! [`IncrementalValidator`] keeps the same state between calls instead.
//!
//! Only [`FailureReason::OutOfOrder`] is raised by the ordered pass. The
//! coverage reasons come from the separate [`CoverageSummary`] pass, applied
//! by [`validate_with_coverage`].

mod coverage;
mod engine;
mod incremental;
mod tolerance;


pub use coverage::{validate_with_coverage, CoverageSummary};
pub use engine::{validate, validate_ordered, ValidationRun};
pub use incremental::IncrementalValidator;
pub use tolerance::ToleranceBands;

use serde::{Deserialize, Serialize};

/// Why an attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureReason {
    /// Ink reached a later stroke's checkpoint before the pointer was satisfied
    OutOfOrder,
    /// Too little of the ink stayed inside the corridor
    InsufficientCoverage,
    /// Too much ink landed far outside every corridor
    ExcessiveOutside,
}

/// A failure and the pointer position at which it was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub reason: FailureReason,
    pub checkpoint_index: usize,
}

/// Mutable per-checkpoint state of one evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CheckpointProgress {
    /// A sample fell inside the corridor while this checkpoint was the pointer
    pub has_contact: bool,
    /// A sample landed inside the start-capture band
    pub touched_start: bool,
    /// Furthest progress reached while this checkpoint was the pointer
    pub max_progress: f32,
    /// Terminal; never reset within a run
    pub completed: bool,
}

/// Reported state of one checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointStatus {
    pub stroke_id: String,
    pub path_index: usize,
    pub global_index: usize,
    pub completed: bool,
    pub has_contact: bool,
    pub max_progress: f32,
}

/// Output of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub statuses: Vec<CheckpointStatus>,
    /// Global index of the next checkpoint to satisfy
    pub active_checkpoint_index: usize,
    pub total_checkpoints: usize,
    pub failure: Option<ValidationFailure>,
}

impl ValidationResult {
    /// No failure and the pointer has moved past the last checkpoint
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
            && self.total_checkpoints > 0
            && self.active_checkpoint_index >= self.total_checkpoints
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        self.failure.map(|f| f.reason)
    }

    pub fn completed_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.completed).count()
    }

    /// Completed checkpoints belonging to one stroke
    pub fn completed_on_path(&self, path_index: usize) -> usize {
        self.statuses
            .iter()
            .filter(|s| s.path_index == path_index && s.completed)
            .count()
    }
}
