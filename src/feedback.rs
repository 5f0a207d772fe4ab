//! Feedback capability injected into the orchestration layer

use serde::{Deserialize, Serialize};

/// Haptic feedback variants a host can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HapticStyle {
    /// No feedback
    #[default]
    None,
    /// Light tick for progress
    Soft,
    /// Strong pattern for mistakes
    Warning,
}

/// Receives feedback requests; implemented by the host platform
pub trait FeedbackSink {
    fn play(&mut self, style: HapticStyle);
}

/// Discards every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl FeedbackSink for NoopFeedback {
    fn play(&mut self, _style: HapticStyle) {}
}

/// Keeps every request, for tests and diagnostics
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    pub played: Vec<HapticStyle>,
}

impl FeedbackSink for RecordingFeedback {
    fn play(&mut self, style: HapticStyle) {
        if style != HapticStyle::None {
            self.played.push(style);
        }
    }
}

impl<F: FeedbackSink + ?Sized> FeedbackSink for &mut F {
    fn play(&mut self, style: HapticStyle) {
        (**self).play(style);
    }
}
