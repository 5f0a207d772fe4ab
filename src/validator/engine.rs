//! The ordered checkpoint state machine

use super::{
    CheckpointProgress, CheckpointStatus, FailureReason, ToleranceBands, ValidationFailure,
    ValidationResult,
};
use crate::checkpoint::{Checkpoint, CheckpointPlan};
use crate::geometry::{nearest_stroke, Point, LENGTH_EPSILON};
use crate::input::{gap_fill, merge_samples, InkSample};
use crate::profile::ValidatorConfig;

/// Gap-fill step as a fraction of the smaller of checkpoint length and corridor radius
const FILL_STEP_FRACTION: f32 = 0.25;

/// Validate committed plus live ink against a plan
pub fn validate(
    plan: &CheckpointPlan,
    config: &ValidatorConfig,
    committed: &[InkSample],
    live: &[InkSample],
) -> ValidationResult {
    validate_ordered(plan, config, &merge_samples(committed, live))
}

/// Validate an already timestamp-ordered sample stream
pub fn validate_ordered(
    plan: &CheckpointPlan,
    config: &ValidatorConfig,
    samples: &[InkSample],
) -> ValidationResult {
    let mut run = ValidationRun::new(plan);
    for sample in samples {
        if run.is_terminal(plan) {
            break;
        }
        run.feed(plan, config, *sample);
    }
    run.result(plan)
}

/// State of one evaluation pass: a progress arena indexed by global
/// checkpoint index, the pointer, and the failure if one was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRun {
    progress: Vec<CheckpointProgress>,
    pointer: usize,
    failure: Option<ValidationFailure>,
    last_sample: Option<InkSample>,
}

impl ValidationRun {
    pub fn new(plan: &CheckpointPlan) -> Self {
        Self {
            progress: vec![CheckpointProgress::default(); plan.len()],
            pointer: 0,
            failure: None,
            last_sample: None,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn failure(&self) -> Option<ValidationFailure> {
        self.failure
    }

    pub fn progress(&self) -> &[CheckpointProgress] {
        &self.progress
    }

    /// Failed, or every checkpoint completed
    pub fn is_terminal(&self, plan: &CheckpointPlan) -> bool {
        self.failure.is_some() || self.pointer >= plan.len()
    }

    /// Consume one sample, filling short jumps from the previous sample first
    pub fn feed(&mut self, plan: &CheckpointPlan, config: &ValidatorConfig, sample: InkSample) {
        let step = config.checkpoint_length.min(config.corridor_radius) * FILL_STEP_FRACTION;
        let prev = self.last_sample.replace(sample);

        for filled in gap_fill(prev.as_ref(), sample, step, config.max_gap_fill) {
            if self.is_terminal(plan) {
                break;
            }
            self.step(plan, config, filled.point());
        }
    }

    /// Apply one sample to the state machine
    fn step(&mut self, plan: &CheckpointPlan, config: &ValidatorConfig, point: Point) {
        let Some(checkpoint) = plan.checkpoints().get(self.pointer).copied() else {
            return;
        };
        let path = &plan.paths()[checkpoint.path_index];
        let projection = path.project(point);

        let advanced = projection.distance <= config.corridor_radius
            && self.track_pointer(&checkpoint, path.total_length(), projection.progress, config.ink_width);

        if advanced {
            if self.pointer >= plan.len() {
                tracing::info!("All {} checkpoints of '{}' completed", plan.len(), plan.template_id());
            }
            return;
        }

        self.detect_out_of_order(plan, config, point, checkpoint.path_index);
    }

    /// Update the pointer checkpoint with an in-corridor sample.
    /// Returns true if the checkpoint completed and the pointer advanced.
    fn track_pointer(
        &mut self,
        checkpoint: &Checkpoint,
        stroke_length: f32,
        progress: f32,
        ink_width: f32,
    ) -> bool {
        let bands = ToleranceBands::new(checkpoint, stroke_length, ink_width);
        if progress < bands.earliest(checkpoint) {
            return false;
        }

        let state = &mut self.progress[self.pointer];
        state.has_contact = true;
        state.max_progress = state.max_progress.max(progress);
        if bands.captures_start(checkpoint, progress) || state.max_progress <= checkpoint.start_progress {
            state.touched_start = true;
        }

        let done = if checkpoint.length <= LENGTH_EPSILON {
            state.touched_start
        } else {
            state.touched_start && state.max_progress >= bands.completion_threshold(checkpoint)
        };

        if done {
            state.completed = true;
            self.pointer += 1;
        }
        done
    }

    /// Fail when the globally nearest checkpoint lies ahead of the pointer on
    /// another stroke
    fn detect_out_of_order(
        &mut self,
        plan: &CheckpointPlan,
        config: &ValidatorConfig,
        point: Point,
        pointer_path: usize,
    ) {
        let Some((path_index, projection)) = nearest_stroke(plan.paths(), point, Some(pointer_path))
        else {
            return;
        };
        if path_index == pointer_path || projection.distance > config.corridor_radius {
            return;
        }

        let Some(nearest) = plan.nearest_checkpoint_on_path(path_index, projection.progress) else {
            return;
        };
        if nearest.global_index > self.pointer {
            tracing::info!(
                "Out-of-order ink on '{}': reached checkpoint {} (stroke '{}') while expecting {}",
                plan.template_id(),
                nearest.global_index,
                plan.stroke_id(path_index),
                self.pointer
            );
            self.failure = Some(ValidationFailure {
                reason: FailureReason::OutOfOrder,
                checkpoint_index: self.pointer,
            });
        }
    }

    /// Snapshot the run as a result
    pub fn result(&self, plan: &CheckpointPlan) -> ValidationResult {
        let statuses = plan
            .checkpoints()
            .iter()
            .zip(&self.progress)
            .map(|(checkpoint, state)| CheckpointStatus {
                stroke_id: plan.stroke_id(checkpoint.path_index).to_string(),
                path_index: checkpoint.path_index,
                global_index: checkpoint.global_index,
                completed: state.completed,
                has_contact: state.has_contact,
                max_progress: state.max_progress,
            })
            .collect();

        ValidationResult {
            statuses,
            active_checkpoint_index: self.pointer,
            total_checkpoints: plan.len(),
            failure: self.failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{GlyphTemplate, Stroke};

    fn config() -> ValidatorConfig {
        ValidatorConfig {
            corridor_radius: 10.0,
            checkpoint_length: 20.0,
            spacing_length: 10.0,
            coverage_threshold: 0.6,
            outside_allowance: 0.3,
            ink_width: 2.0,
            max_gap_fill: 0.0,
        }
    }

    fn line_plan() -> CheckpointPlan {
        let template = GlyphTemplate::new(
            "dash",
            vec![Stroke::from_points("s", 0, vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)])],
        );
        CheckpointPlan::build(&template, 20.0, 10.0)
    }

    fn run_points(plan: &CheckpointPlan, config: &ValidatorConfig, xs: &[f32]) -> ValidationRun {
        let mut run = ValidationRun::new(plan);
        for (i, x) in xs.iter().enumerate() {
            run.feed(plan, config, InkSample::new(*x, 0.0, i as u64, 0));
        }
        run
    }

    #[test]
    fn test_single_glancing_sample_does_not_complete() {
        let plan = line_plan();
        // Lands beyond the start band of checkpoint 0
        let run = run_points(&plan, &config(), &[15.0]);

        assert_eq!(run.pointer(), 0);
        assert!(run.progress()[0].has_contact);
        assert!(!run.progress()[0].touched_start);
        assert!(!run.progress()[0].completed);
    }

    #[test]
    fn test_start_then_advance_completes() {
        let plan = line_plan();
        let run = run_points(&plan, &config(), &[0.0, 10.0, 15.0]);

        assert!(run.progress()[0].completed);
        assert_eq!(run.pointer(), 1);
        assert!(!run.progress()[1].has_contact);
    }

    #[test]
    fn test_leaving_corridor_keeps_partial_progress() {
        let plan = line_plan();
        let mut run = run_points(&plan, &config(), &[0.0, 8.0]);
        run.feed(&plan, &config(), InkSample::new(10.0, 40.0, 10, 0));
        run.feed(&plan, &config(), InkSample::new(16.0, 0.0, 11, 0));

        assert!(run.failure().is_none());
        assert!(run.progress()[0].completed);
    }

    #[test]
    fn test_sample_before_earliest_is_ignored() {
        let plan = line_plan();
        let mut run = run_points(&plan, &config(), &[0.0, 10.0, 16.0]);
        // Pointer on checkpoint 1 (30-50); 5.0 is well before its band
        run.feed(&plan, &config(), InkSample::new(5.0, 0.0, 10, 0));

        assert_eq!(run.pointer(), 1);
        assert!(!run.progress()[1].has_contact);
    }

    #[test]
    fn test_dot_stroke_completes_on_contact() {
        let template = GlyphTemplate::new(
            "dot",
            vec![Stroke::from_points("d", 0, vec![Point::new(50.0, 50.0)])],
        );
        let plan = CheckpointPlan::build(&template, 20.0, 10.0);
        let mut run = ValidationRun::new(&plan);
        run.feed(&plan, &config(), InkSample::new(53.0, 52.0, 0, 0));

        assert!(run.is_terminal(&plan));
        assert!(run.result(&plan).is_complete());
    }

    #[test]
    fn test_empty_stream_is_not_attempted() {
        let plan = line_plan();
        let result = validate(&plan, &config(), &[], &[]);

        assert_eq!(result.active_checkpoint_index, 0);
        assert_eq!(result.total_checkpoints, 4);
        assert!(result.failure.is_none());
        assert!(!result.is_complete());
        assert_eq!(result.completed_count(), 0);
    }

    #[test]
    fn test_gap_fill_bridges_fast_strokes() {
        let plan = line_plan();
        let sparse = [0.0, 25.0, 50.0, 75.0, 100.0];

        let without = run_points(&plan, &config(), &sparse);
        assert!(!without.is_terminal(&plan));

        let filling = ValidatorConfig {
            max_gap_fill: 60.0,
            ..config()
        };
        let with = run_points(&plan, &filling, &sparse);
        assert!(with.result(&plan).is_complete());
    }
}
