//! Adaptive start/end tolerance bands

use crate::checkpoint::Checkpoint;
use crate::geometry::LENGTH_EPSILON;

const START_LENGTH_FACTOR: f32 = 0.4;
const START_INK_FACTOR: f32 = 1.2;
const END_LENGTH_FACTOR: f32 = 0.3;
const END_INK_FACTOR: f32 = 1.0;

/// Bands are capped at these fractions of the checkpoint span so they never
/// reach into a neighbouring checkpoint
const MAX_START_SPAN_FRACTION: f32 = 0.5;
const MAX_END_SPAN_FRACTION: f32 = 0.4;

/// Completion needs at least this much of the span covered
const MIN_ADVANCE_FRACTION: f32 = 0.6;

/// Start/end tolerances of a checkpoint, in normalized progress units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBands {
    pub start: f32,
    pub end: f32,
}

impl ToleranceBands {
    pub fn new(checkpoint: &Checkpoint, stroke_length: f32, ink_width: f32) -> Self {
        if stroke_length <= LENGTH_EPSILON {
            return Self { start: 0.0, end: 0.0 };
        }

        let span = checkpoint.span().max(0.0);
        let start = (START_LENGTH_FACTOR * checkpoint.length).max(START_INK_FACTOR * ink_width)
            / stroke_length;
        let end =
            (END_LENGTH_FACTOR * checkpoint.length).max(END_INK_FACTOR * ink_width) / stroke_length;

        Self {
            start: start.clamp(0.0, span * MAX_START_SPAN_FRACTION),
            end: end.clamp(0.0, span * MAX_END_SPAN_FRACTION),
        }
    }

    /// Earliest progress at which a sample counts towards this checkpoint
    pub fn earliest(&self, checkpoint: &Checkpoint) -> f32 {
        checkpoint.start_progress - self.start
    }

    /// Whether `progress` falls in the start-capture band
    pub fn captures_start(&self, checkpoint: &Checkpoint, progress: f32) -> bool {
        (progress - checkpoint.start_progress).abs() <= self.start
    }

    /// Progress the pointer must reach before the checkpoint completes
    pub fn completion_threshold(&self, checkpoint: &Checkpoint) -> f32 {
        let min_advance = checkpoint.start_progress + MIN_ADVANCE_FRACTION * checkpoint.span();
        (checkpoint.end_progress - self.end).max(min_advance)
    }
}
