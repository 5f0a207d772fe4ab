//! Checkpoint module - partitions reference strokes into ordered checkpoints

mod cache;
mod plan;

pub use cache::{PlanCache, PlanKey};
pub use plan::{build_stroke_checkpoints, CheckpointPlan};

use serde::{Deserialize, Serialize};

/// A short arc-length span of a reference stroke that must be visited in order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Index of the owning stroke, in draw order
    pub path_index: usize,
    /// Position in the glyph-wide checkpoint sequence
    pub global_index: usize,
    /// Normalized start of the span within its stroke (0.0 - 1.0)
    pub start_progress: f32,
    /// Normalized end of the span within its stroke (0.0 - 1.0)
    pub end_progress: f32,
    /// Physical arc length of the span
    pub length: f32,
}

impl Checkpoint {
    /// Normalized width of the span
    pub fn span(&self) -> f32 {
        self.end_progress - self.start_progress
    }

    /// Distance in progress units from `progress` to this span (0 inside it)
    pub fn progress_gap(&self, progress: f32) -> f32 {
        if progress < self.start_progress {
            self.start_progress - progress
        } else if progress > self.end_progress {
            progress - self.end_progress
        } else {
            0.0
        }
    }
}
