//! Ink recorder - collects committed and live samples from pen events

use super::InkSample;

/// Configuration for ink recording
#[derive(Debug, Clone)]
pub struct InkRecorderConfig {
    /// Minimum distance between consecutive samples of one stroke
    pub min_distance: f32,
}

impl Default for InkRecorderConfig {
    fn default() -> Self {
        Self { min_distance: 1.0 }
    }
}

/// Splits pen input into committed (finished) strokes and the live stroke.
///
/// Samples of one ink stroke closer than `min_distance` to the previous
/// accepted sample are dropped; the first sample of a stroke always passes.
#[derive(Debug, Clone)]
pub struct InkRecorder {
    config: InkRecorderConfig,
    committed: Vec<InkSample>,
    live: Vec<InkSample>,
    next_stroke: u32,
    pen_down: bool,
}

impl InkRecorder {
    pub fn new() -> Self {
        Self::with_config(InkRecorderConfig::default())
    }

    pub fn with_config(config: InkRecorderConfig) -> Self {
        Self {
            config,
            committed: Vec::with_capacity(256),
            live: Vec::with_capacity(64),
            next_stroke: 0,
            pen_down: false,
        }
    }

    /// Start a new ink stroke. An unfinished live stroke is committed first.
    pub fn pen_down(&mut self, x: f32, y: f32, timestamp_ms: u64) -> Option<InkSample> {
        if self.pen_down {
            tracing::warn!("pen_down while a stroke is live; committing it first");
            self.pen_up();
        }
        self.pen_down = true;
        self.accept(InkSample::new(x, y, timestamp_ms, self.next_stroke))
    }

    /// Extend the live stroke.
    /// Returns Some if the sample was recorded, None if filtered out
    pub fn pen_move(&mut self, x: f32, y: f32, timestamp_ms: u64) -> Option<InkSample> {
        if !self.pen_down {
            return None;
        }

        let sample = InkSample::new(x, y, timestamp_ms, self.next_stroke);
        if let Some(last) = self.live.last() {
            if last.point().distance(sample.point()) < self.config.min_distance {
                return None;
            }
        }
        self.accept(sample)
    }

    /// Finish the live stroke and move it into the committed record
    pub fn pen_up(&mut self) {
        if !self.pen_down {
            return;
        }
        self.pen_down = false;
        self.committed.append(&mut self.live);
        self.next_stroke = self.next_stroke.saturating_add(1);
    }

    fn accept(&mut self, sample: InkSample) -> Option<InkSample> {
        if !sample.point().is_finite() {
            tracing::warn!("Dropping non-finite ink sample");
            return None;
        }
        self.live.push(sample);
        Some(sample)
    }

    pub fn committed(&self) -> &[InkSample] {
        &self.committed
    }

    pub fn live(&self) -> &[InkSample] {
        &self.live
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    /// Number of finished ink strokes
    pub fn committed_strokes(&self) -> u32 {
        self.next_stroke
    }

    /// Discard all ink (call when an attempt is reset)
    pub fn reset(&mut self) {
        self.committed.clear();
        self.live.clear();
        self.next_stroke = 0;
        self.pen_down = false;
    }
}

impl Default for InkRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_distance_filter() {
        let mut recorder = InkRecorder::with_config(InkRecorderConfig { min_distance: 5.0 });

        // First point always passes
        assert!(recorder.pen_down(0.0, 0.0, 0).is_some());

        // Too close - should be filtered
        assert!(recorder.pen_move(1.0, 1.0, 5).is_none());

        // Far enough - should pass
        assert!(recorder.pen_move(10.0, 10.0, 10).is_some());
        assert_eq!(recorder.live().len(), 2);
    }

    #[test]
    fn test_pen_up_commits_live_stroke() {
        let mut recorder = InkRecorder::new();

        recorder.pen_down(0.0, 0.0, 0);
        recorder.pen_move(10.0, 0.0, 10);
        recorder.pen_up();
        recorder.pen_down(0.0, 20.0, 30);

        assert_eq!(recorder.committed().len(), 2);
        assert_eq!(recorder.live().len(), 1);
        assert_eq!(recorder.committed()[0].stroke, 0);
        assert_eq!(recorder.live()[0].stroke, 1);
        assert_eq!(recorder.committed_strokes(), 1);
    }

    #[test]
    fn test_move_without_pen_down_is_ignored() {
        let mut recorder = InkRecorder::new();
        assert!(recorder.pen_move(5.0, 5.0, 0).is_none());
        assert!(recorder.live().is_empty());
    }

    #[test]
    fn test_double_pen_down_commits_previous_stroke() {
        let mut recorder = InkRecorder::new();
        recorder.pen_down(0.0, 0.0, 0);
        recorder.pen_down(50.0, 0.0, 10);

        assert_eq!(recorder.committed().len(), 1);
        assert_eq!(recorder.live()[0].stroke, 1);
    }

    #[test]
    fn test_non_finite_sample_is_dropped() {
        let mut recorder = InkRecorder::new();
        assert!(recorder.pen_down(f32::NAN, 0.0, 0).is_none());
        assert!(recorder.is_pen_down());
        assert!(recorder.pen_move(3.0, 0.0, 5).is_some());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut recorder = InkRecorder::new();
        recorder.pen_down(0.0, 0.0, 0);
        recorder.pen_move(10.0, 0.0, 10);
        recorder.pen_up();

        recorder.reset();

        assert!(recorder.committed().is_empty());
        assert!(recorder.live().is_empty());
        assert_eq!(recorder.committed_strokes(), 0);
        assert!(!recorder.is_pen_down());
    }
}
