//! Checkpoint plan builder

use std::ops::Range;

use super::Checkpoint;
use crate::geometry::{PolylinePath, LENGTH_EPSILON};
use crate::profile::ValidatorConfig;
use crate::template::GlyphTemplate;

/// Ordered checkpoints for every stroke of a glyph, plus the stroke geometry
/// the validator projects against.
///
/// Immutable once built; share it behind an `Arc` (see [`super::PlanCache`]).
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointPlan {
    template_id: String,
    stroke_ids: Vec<String>,
    paths: Vec<PolylinePath>,
    checkpoints: Vec<Checkpoint>,
    /// Range of `checkpoints` owned by each path
    stroke_ranges: Vec<Range<usize>>,
}

impl CheckpointPlan {
    /// Build a plan from a laid-out template
    pub fn build(template: &GlyphTemplate, checkpoint_length: f32, spacing_length: f32) -> Self {
        let strokes = template.ordered_strokes();
        let mut stroke_ids = Vec::with_capacity(strokes.len());
        let mut paths = Vec::with_capacity(strokes.len());
        let mut checkpoints = Vec::new();
        let mut stroke_ranges = Vec::with_capacity(strokes.len());

        for (path_index, stroke) in strokes.iter().enumerate() {
            let path = PolylinePath::new(&stroke.polyline());
            let first = checkpoints.len();

            for mut checkpoint in build_stroke_checkpoints(&path, checkpoint_length, spacing_length) {
                checkpoint.path_index = path_index;
                checkpoint.global_index = checkpoints.len();
                checkpoints.push(checkpoint);
            }

            stroke_ranges.push(first..checkpoints.len());
            stroke_ids.push(stroke.id.clone());
            paths.push(path);
        }

        tracing::debug!(
            "Built checkpoint plan for '{}': {} strokes, {} checkpoints (length {:.2}, spacing {:.2})",
            template.id,
            paths.len(),
            checkpoints.len(),
            checkpoint_length,
            spacing_length
        );

        Self {
            template_id: template.id.clone(),
            stroke_ids,
            paths,
            checkpoints,
            stroke_ranges,
        }
    }

    /// Build with the checkpoint/spacing lengths of a validator configuration
    pub fn for_config(template: &GlyphTemplate, config: &ValidatorConfig) -> Self {
        Self::build(template, config.checkpoint_length, config.spacing_length)
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn paths(&self) -> &[PolylinePath] {
        &self.paths
    }

    pub fn stroke_count(&self) -> usize {
        self.paths.len()
    }

    pub fn stroke_id(&self, path_index: usize) -> &str {
        self.stroke_ids.get(path_index).map_or("", String::as_str)
    }

    /// Checkpoints owned by one stroke, in order
    pub fn stroke_checkpoints(&self, path_index: usize) -> &[Checkpoint] {
        self.stroke_ranges
            .get(path_index)
            .and_then(|range| self.checkpoints.get(range.clone()))
            .unwrap_or(&[])
    }

    /// The checkpoint on `path_index` closest to `progress` along that stroke.
    /// Ties go to the earlier checkpoint.
    pub fn nearest_checkpoint_on_path(&self, path_index: usize, progress: f32) -> Option<&Checkpoint> {
        let mut best: Option<&Checkpoint> = None;
        for checkpoint in self.stroke_checkpoints(path_index) {
            let closer = best.map_or(true, |b| {
                checkpoint.progress_gap(progress) < b.progress_gap(progress)
            });
            if closer {
                best = Some(checkpoint);
            }
        }
        best
    }
}

/// A clipped last span shorter than this fraction of `checkpoint_length` is
/// folded into the span before it
const MIN_TAIL_FRACTION: f32 = 0.5;

/// Partition one stroke into checkpoint spans.
///
/// Arc length is walked from 0, alternating a checkpoint span of
/// `checkpoint_length` with a gap of `spacing_length`; the last span is
/// clipped to the stroke, and a clipped tail shorter than half a checkpoint
/// is merged into the previous span (across the gap) instead of standing
/// alone. With spacing ~0 the checkpoints are contiguous: the stroke is still
/// walked in `checkpoint_length` steps, not collapsed into one checkpoint.
/// Degenerate strokes, and strokes too short to yield a span, get a single
/// checkpoint covering `[0, 1]`. `path_index`/`global_index` are left at 0
/// for the caller to assign.
pub fn build_stroke_checkpoints(
    path: &PolylinePath,
    checkpoint_length: f32,
    spacing_length: f32,
) -> Vec<Checkpoint> {
    let total = path.total_length();
    let whole = Checkpoint {
        path_index: 0,
        global_index: 0,
        start_progress: 0.0,
        end_progress: 1.0,
        length: if path.is_degenerate() { 0.0 } else { total },
    };

    if path.is_degenerate() || !checkpoint_length.is_finite() || checkpoint_length <= LENGTH_EPSILON {
        return vec![whole];
    }

    let spacing = if spacing_length.is_finite() { spacing_length.max(0.0) } else { 0.0 };
    let pattern: &[f32] = if spacing <= LENGTH_EPSILON {
        &[checkpoint_length]
    } else {
        &[checkpoint_length, spacing]
    };

    let mut checkpoints = Vec::new();
    let mut cursor = 0.0_f32;
    let mut phase = 0;

    while total - cursor > LENGTH_EPSILON {
        let end = (cursor + pattern[phase % pattern.len()]).min(total);
        if phase % pattern.len() == 0 {
            checkpoints.push(Checkpoint {
                start_progress: path.normalize(cursor),
                end_progress: path.normalize(end),
                length: end - cursor,
                ..whole
            });
        }
        cursor = end;
        phase += 1;
    }

    if checkpoints.len() >= 2 {
        let tail = checkpoints[checkpoints.len() - 1];
        if tail.length < MIN_TAIL_FRACTION * checkpoint_length {
            checkpoints.pop();
            if let Some(prev) = checkpoints.last_mut() {
                prev.end_progress = tail.end_progress;
                prev.length = (tail.end_progress - prev.start_progress) * total;
            }
        }
    }

    if checkpoints.is_empty() {
        checkpoints.push(whole);
    }
    checkpoints
}
