//! Coverage pass - corridor contact summary over a whole attempt
//!
//! Runs after the ordered pass, over the merged raw samples (no gap filling).

use serde::{Deserialize, Serialize};

use super::{validate, FailureReason, ValidationFailure, ValidationResult};
use crate::checkpoint::CheckpointPlan;
use crate::geometry::nearest_stroke;
use crate::input::{merge_samples, InkSample};
use crate::profile::ValidatorConfig;

/// Samples farther than this multiple of the corridor radius from every
/// stroke count as far outside
const FAR_OUTSIDE_FACTOR: f32 = 2.0;

/// How an attempt's samples sit relative to the stroke corridors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub sample_count: usize,
    /// Samples within the corridor of some stroke
    pub in_corridor: usize,
    /// Samples beyond the far-outside distance of every stroke
    pub far_outside: usize,
}

impl CoverageSummary {
    pub fn measure(plan: &CheckpointPlan, config: &ValidatorConfig, samples: &[InkSample]) -> Self {
        let far = config.corridor_radius * FAR_OUTSIDE_FACTOR;
        let mut summary = Self {
            sample_count: samples.len(),
            ..Self::default()
        };

        for sample in samples {
            let distance = nearest_stroke(plan.paths(), sample.point(), None)
                .map_or(f32::INFINITY, |(_, p)| p.distance);
            if distance <= config.corridor_radius {
                summary.in_corridor += 1;
            } else if distance > far {
                summary.far_outside += 1;
            }
        }

        summary
    }

    /// Fraction of samples inside a corridor (1.0 with no samples)
    pub fn contact_ratio(&self) -> f32 {
        if self.sample_count == 0 {
            return 1.0;
        }
        self.in_corridor as f32 / self.sample_count as f32
    }

    /// Fraction of samples far outside every corridor
    pub fn outside_ratio(&self) -> f32 {
        if self.sample_count == 0 {
            return 0.0;
        }
        self.far_outside as f32 / self.sample_count as f32
    }

    /// Coverage failure, if any. Far-outside ink is checked first.
    pub fn verdict(&self, config: &ValidatorConfig) -> Option<FailureReason> {
        if self.sample_count == 0 {
            None
        } else if self.outside_ratio() > config.outside_allowance {
            Some(FailureReason::ExcessiveOutside)
        } else if self.contact_ratio() < config.coverage_threshold {
            Some(FailureReason::InsufficientCoverage)
        } else {
            None
        }
    }
}

/// Ordered validation followed by the coverage pass.
///
/// The coverage verdict only applies to attempts the ordered pass reports as
/// complete; in-progress and already-failed attempts are returned unchanged.
pub fn validate_with_coverage(
    plan: &CheckpointPlan,
    config: &ValidatorConfig,
    committed: &[InkSample],
    live: &[InkSample],
) -> ValidationResult {
    let mut result = validate(plan, config, committed, live);
    if !result.is_complete() {
        return result;
    }

    let summary = CoverageSummary::measure(plan, config, &merge_samples(committed, live));
    if let Some(reason) = summary.verdict(config) {
        tracing::info!(
            "Coverage check failed for '{}': {:?} (contact {:.2}, outside {:.2})",
            plan.template_id(),
            reason,
            summary.contact_ratio(),
            summary.outside_ratio()
        );
        result.failure = Some(ValidationFailure {
            reason,
            checkpoint_index: result.active_checkpoint_index,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::template::{GlyphTemplate, Stroke};

    fn config() -> ValidatorConfig {
        ValidatorConfig {
            corridor_radius: 10.0,
            checkpoint_length: 20.0,
            spacing_length: 10.0,
            coverage_threshold: 0.7,
            outside_allowance: 0.2,
            ink_width: 2.0,
            max_gap_fill: 60.0,
        }
    }

    fn plan() -> CheckpointPlan {
        let template = GlyphTemplate::new(
            "dash",
            vec![Stroke::from_points("s", 0, vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)])],
        );
        CheckpointPlan::build(&template, 20.0, 10.0)
    }

    fn trace(count: usize, y: f32) -> Vec<InkSample> {
        (0..=count)
            .map(|i| InkSample::new(i as f32 * 100.0 / count as f32, y, i as u64, 0))
            .collect()
    }

    #[test]
    fn test_measure_classifies_samples() {
        let samples = [
            InkSample::new(10.0, 5.0, 0, 0),
            InkSample::new(10.0, 15.0, 1, 0),
            InkSample::new(10.0, 50.0, 2, 0),
        ];
        let summary = CoverageSummary::measure(&plan(), &config(), &samples);

        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.in_corridor, 1);
        assert_eq!(summary.far_outside, 1);
    }

    #[test]
    fn test_clean_trace_passes() {
        let samples = trace(40, 1.0);
        let result = validate_with_coverage(&plan(), &config(), &samples, &[]);
        assert!(result.is_complete());
    }

    #[test]
    fn test_scribbles_raise_excessive_outside() {
        let mut committed = trace(40, 1.0);
        committed.extend((0..20).map(|i| InkSample::new(i as f32 * 5.0, 80.0, 100 + i, 1)));

        let result = validate_with_coverage(&plan(), &config(), &committed, &[]);
        assert_eq!(result.failure_reason(), Some(FailureReason::ExcessiveOutside));
        assert!(!result.is_complete());

        // The ordered pass alone does not look at stray ink
        assert!(validate(&plan(), &config(), &committed, &[]).is_complete());
    }

    #[test]
    fn test_drifting_ink_raises_insufficient_coverage() {
        let mut committed = trace(40, 1.0);
        // Just outside the corridor but not far outside
        committed.extend((0..30).map(|i| InkSample::new(i as f32 * 3.0, 15.0, 100 + i, 1)));

        let result = validate_with_coverage(&plan(), &config(), &committed, &[]);
        assert_eq!(result.failure_reason(), Some(FailureReason::InsufficientCoverage));
    }

    #[test]
    fn test_incomplete_attempt_is_untouched() {
        let samples: Vec<InkSample> = trace(40, 1.0).into_iter().take(10).collect();
        let result = validate_with_coverage(&plan(), &config(), &samples, &[]);
        assert!(result.failure.is_none());
        assert!(!result.is_complete());
    }

    #[test]
    fn test_empty_summary_has_no_verdict() {
        assert_eq!(CoverageSummary::default().verdict(&config()), None);
    }
}
