//! Incremental validation - keeps run state between ink deltas

use std::sync::Arc;

use super::{ValidationResult, ValidationRun};
use crate::checkpoint::CheckpointPlan;
use crate::input::InkSample;
use crate::profile::ValidatorConfig;

/// Persists checkpoint progress across calls and only processes new samples.
///
/// Produces the same result as [`super::validate_ordered`] over the same
/// stream. A sample older than the newest one seen is spliced into the log
/// by timestamp and the whole log is replayed.
#[derive(Debug, Clone)]
pub struct IncrementalValidator {
    plan: Arc<CheckpointPlan>,
    config: ValidatorConfig,
    run: ValidationRun,
    log: Vec<InkSample>,
}

impl IncrementalValidator {
    pub fn new(plan: Arc<CheckpointPlan>, config: ValidatorConfig) -> Self {
        let run = ValidationRun::new(&plan);
        Self {
            plan,
            config,
            run,
            log: Vec::with_capacity(256),
        }
    }

    pub fn plan(&self) -> &Arc<CheckpointPlan> {
        &self.plan
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Process one new sample
    pub fn push(&mut self, sample: InkSample) {
        let late = self
            .log
            .last()
            .is_some_and(|last| sample.timestamp_ms < last.timestamp_ms);

        if late {
            tracing::warn!(
                "Late ink sample at {}ms; replaying {} samples",
                sample.timestamp_ms,
                self.log.len()
            );
            let at = self.log.partition_point(|s| s.timestamp_ms <= sample.timestamp_ms);
            self.log.insert(at, sample);
            self.replay();
            return;
        }

        self.log.push(sample);
        if !self.run.is_terminal(&self.plan) {
            self.run.feed(&self.plan, &self.config, sample);
        }
    }

    pub fn extend(&mut self, samples: impl IntoIterator<Item = InkSample>) {
        for sample in samples {
            self.push(sample);
        }
    }

    pub fn result(&self) -> ValidationResult {
        self.run.result(&self.plan)
    }

    pub fn is_terminal(&self) -> bool {
        self.run.is_terminal(&self.plan)
    }

    /// Samples processed so far, in evaluation order
    pub fn samples(&self) -> &[InkSample] {
        &self.log
    }

    /// Start a fresh attempt
    pub fn reset(&mut self) {
        self.log.clear();
        self.run = ValidationRun::new(&self.plan);
    }

    fn replay(&mut self) {
        self.run = ValidationRun::new(&self.plan);
        for sample in &self.log {
            if self.run.is_terminal(&self.plan) {
                break;
            }
            self.run.feed(&self.plan, &self.config, *sample);
        }
    }
}
