//! Trace session - wires pen events, validation and feedback for one row
//!
//! The session returns an explicit [`SessionUpdate`] for every pen event;
//! hosts re-render from it. After a failure the attempt is reset and the
//! learner starts over from the first checkpoint.

use std::sync::Arc;

use serde::Serialize;

use crate::checkpoint::{CheckpointPlan, PlanCache};
use crate::feedback::{FeedbackSink, HapticStyle};
use crate::input::{merge_samples, InkRecorder};
use crate::profile::{DifficultyProfile, RowScale, ValidatorConfig};
use crate::template::GlyphTemplate;
use crate::validator::{IncrementalValidator, ValidationFailure, ValidationResult};

/// Something the host should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SessionEvent {
    /// More checkpoints were completed
    Progress { completed: usize },
    /// Every checkpoint was completed
    Completed,
    /// The attempt failed and was reset
    Failed { failure: ValidationFailure },
}

/// State after one pen event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub result: ValidationResult,
    pub events: Vec<SessionEvent>,
    /// Ink was discarded because the attempt failed
    pub attempt_reset: bool,
}

pub struct TraceSession<F: FeedbackSink> {
    validator: IncrementalValidator,
    recorder: InkRecorder,
    profile: DifficultyProfile,
    feedback: F,
    completed: usize,
    finished: bool,
    last_warning_ms: Option<u64>,
}

impl<F: FeedbackSink> TraceSession<F> {
    pub fn new(
        plan: Arc<CheckpointPlan>,
        config: ValidatorConfig,
        profile: DifficultyProfile,
        feedback: F,
    ) -> Self {
        Self {
            validator: IncrementalValidator::new(plan, config),
            recorder: InkRecorder::new(),
            profile,
            feedback,
            completed: 0,
            finished: false,
            last_warning_ms: None,
        }
    }

    /// Build the configuration for a row and fetch the plan through `cache`
    pub fn for_row(
        template: &GlyphTemplate,
        cache: &PlanCache,
        profile: DifficultyProfile,
        scale: RowScale,
        ink_width: f32,
        feedback: F,
    ) -> Self {
        let config = ValidatorConfig::for_row(&profile, scale, ink_width);
        let plan = cache.get_or_build(template, &config);
        Self::new(plan, config, profile, feedback)
    }

    /// Swap in a new plan/config (row scale or tier changed) and replay the
    /// current ink against it
    pub fn reconfigure(&mut self, plan: Arc<CheckpointPlan>, config: ValidatorConfig, profile: DifficultyProfile) {
        tracing::debug!("Reconfiguring trace session for '{}'", plan.template_id());
        self.profile = profile;
        self.validator = IncrementalValidator::new(plan, config);
        self.validator
            .extend(merge_samples(self.recorder.committed(), self.recorder.live()));
        self.completed = self.validator.result().completed_count();
        self.finished = self.validator.result().is_complete();
    }

    pub fn pen_down(&mut self, x: f32, y: f32, timestamp_ms: u64) -> SessionUpdate {
        if let Some(sample) = self.recorder.pen_down(x, y, timestamp_ms) {
            self.validator.push(sample);
        }
        self.evaluate(timestamp_ms)
    }

    pub fn pen_move(&mut self, x: f32, y: f32, timestamp_ms: u64) -> SessionUpdate {
        if let Some(sample) = self.recorder.pen_move(x, y, timestamp_ms) {
            self.validator.push(sample);
        }
        self.evaluate(timestamp_ms)
    }

    pub fn pen_up(&mut self, timestamp_ms: u64) -> SessionUpdate {
        self.recorder.pen_up();
        self.evaluate(timestamp_ms)
    }

    pub fn result(&self) -> ValidationResult {
        self.validator.result()
    }

    pub fn recorder(&self) -> &InkRecorder {
        &self.recorder
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Discard the current attempt
    pub fn reset(&mut self) {
        self.recorder.reset();
        self.validator.reset();
        self.completed = 0;
        self.finished = false;
    }

    fn evaluate(&mut self, now_ms: u64) -> SessionUpdate {
        let result = self.validator.result();
        let mut events = Vec::new();

        let completed = result.completed_count();
        if completed > self.completed {
            self.completed = completed;
            self.feedback.play(self.profile.haptic_style);
            events.push(SessionEvent::Progress { completed });
        }

        if result.is_complete() && !self.finished {
            self.finished = true;
            events.push(SessionEvent::Completed);
        }

        let mut attempt_reset = false;
        if let Some(failure) = result.failure {
            events.push(SessionEvent::Failed { failure });
            let cooled_down = self
                .last_warning_ms
                .map_or(true, |last| now_ms.saturating_sub(last) >= self.profile.warning_cooldown_ms);
            if cooled_down {
                self.feedback.play(HapticStyle::Warning);
                self.last_warning_ms = Some(now_ms);
            }
            self.reset();
            attempt_reset = true;
        }

        SessionUpdate {
            result,
            events,
            attempt_reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::RecordingFeedback;
    use crate::geometry::Point;
    use crate::profile::DifficultyTier;
    use crate::template::Stroke;

    fn template() -> GlyphTemplate {
        GlyphTemplate::new(
            "t",
            vec![
                Stroke::from_points("stem", 0, vec![Point::new(50.0, 0.0), Point::new(50.0, 100.0)]),
                Stroke::from_points("bar", 1, vec![Point::new(20.0, 30.0), Point::new(80.0, 30.0)]),
            ],
        )
    }

    fn session(cache: &PlanCache) -> TraceSession<RecordingFeedback> {
        TraceSession::for_row(
            &template(),
            cache,
            DifficultyTier::Beginner.profile(),
            RowScale::default(),
            4.0,
            RecordingFeedback::default(),
        )
    }

    fn draw(session: &mut TraceSession<RecordingFeedback>, from: Point, to: Point, t0: u64) -> Vec<SessionUpdate> {
        let mut updates = vec![session.pen_down(from.x, from.y, t0)];
        for i in 1..=50 {
            let p = from.lerp(to, i as f32 / 50.0);
            updates.push(session.pen_move(p.x, p.y, t0 + i as u64 * 8));
        }
        updates.push(session.pen_up(t0 + 500));
        updates
    }

    #[test]
    fn test_correct_attempt_completes_with_soft_feedback() {
        let cache = PlanCache::new();
        let mut session = session(&cache);

        draw(&mut session, Point::new(50.0, 0.0), Point::new(50.0, 100.0), 0);
        let updates = draw(&mut session, Point::new(20.0, 30.0), Point::new(80.0, 30.0), 1_000);

        let completed_events = updates
            .iter()
            .flat_map(|u| &u.events)
            .filter(|e| **e == SessionEvent::Completed)
            .count();
        assert_eq!(completed_events, 1);
        assert!(session.result().is_complete());
        assert!(!session.feedback().played.is_empty());
        assert!(session.feedback().played.iter().all(|s| *s == HapticStyle::Soft));
    }

    #[test]
    fn test_failure_resets_attempt_and_warns_once_per_cooldown() {
        let cache = PlanCache::new();
        let mut session = session(&cache);

        let first = session.pen_down(20.0, 30.0, 0);
        assert!(first.attempt_reset);
        assert!(matches!(first.events[0], SessionEvent::Failed { .. }));
        assert!(session.recorder().committed().is_empty());
        assert_eq!(session.result().active_checkpoint_index, 0);

        // Pen is no longer down after the reset
        let ignored = session.pen_move(25.0, 30.0, 10);
        assert!(ignored.events.is_empty());

        // Second mistake inside the cooldown: reported but not buzzed
        let second = session.pen_down(20.0, 30.0, 100);
        assert!(second.attempt_reset);
        assert_eq!(session.feedback().played, vec![HapticStyle::Warning]);

        // After the cooldown the warning plays again
        session.pen_down(20.0, 30.0, 5_000);
        assert_eq!(
            session.feedback().played,
            vec![HapticStyle::Warning, HapticStyle::Warning]
        );
    }

    #[test]
    fn test_reconfigure_replays_ink() {
        let cache = PlanCache::new();
        let mut session = session(&cache);
        draw(&mut session, Point::new(50.0, 0.0), Point::new(50.0, 100.0), 0);
        let before = session.result().completed_count();
        assert!(before > 0);

        let profile = DifficultyTier::Intermediate.profile();
        let config = ValidatorConfig::for_row(&profile, RowScale::default(), 4.0);
        let plan = cache.get_or_build(&template(), &config);
        session.reconfigure(plan, config, profile);

        let result = session.result();
        assert_eq!(result.active_checkpoint_index, result.completed_count());
        assert!(result.completed_count() > 0);
        assert!(result.failure.is_none());
    }
}
