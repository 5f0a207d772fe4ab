//! Input module - ink samples, recording and gap filling

mod interpolation;
mod recorder;

pub use interpolation::{fill_gaps, gap_fill};
pub use recorder::{InkRecorder, InkRecorderConfig};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A single ink observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InkSample {
    /// X coordinate in layout space
    pub x: f32,
    /// Y coordinate in layout space
    pub y: f32,
    /// Timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Index of the pen-down stroke this sample belongs to
    pub stroke: u32,
}

impl InkSample {
    pub fn new(x: f32, y: f32, timestamp_ms: u64, stroke: u32) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            stroke,
        }
    }

    pub fn at(point: Point, timestamp_ms: u64, stroke: u32) -> Self {
        Self::new(point.x, point.y, timestamp_ms, stroke)
    }

    /// Create a sample stamped with the current time
    pub fn now(x: f32, y: f32, stroke: u32) -> Self {
        Self::new(x, y, current_time_ms(), stroke)
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Merge committed and live samples into one timestamp-ordered stream.
///
/// The sort is stable, so samples with equal timestamps keep arrival order
/// (committed before live, then their order within each group).
pub fn merge_samples(committed: &[InkSample], live: &[InkSample]) -> Vec<InkSample> {
    let mut merged = Vec::with_capacity(committed.len() + live.len());
    merged.extend_from_slice(committed);
    merged.extend_from_slice(live);
    merged.sort_by_key(|s| s.timestamp_ms);
    merged
}

/// Get current time in milliseconds
fn current_time_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_creation() {
        let sample = InkSample::now(100.0, 200.0, 2);

        assert_eq!(sample.point(), Point::new(100.0, 200.0));
        assert_eq!(sample.stroke, 2);
        assert!(sample.timestamp_ms > 0);
    }

    #[test]
    fn test_merge_orders_by_timestamp() {
        let committed = [InkSample::new(0.0, 0.0, 10, 0), InkSample::new(1.0, 0.0, 30, 0)];
        let live = [InkSample::new(2.0, 0.0, 20, 1)];

        let merged = merge_samples(&committed, &live);
        let times: Vec<u64> = merged.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn test_merge_keeps_arrival_order_on_ties() {
        let committed = [InkSample::new(0.0, 0.0, 10, 0)];
        let live = [InkSample::new(5.0, 0.0, 10, 1), InkSample::new(6.0, 0.0, 10, 1)];

        let merged = merge_samples(&committed, &live);
        let xs: Vec<f32> = merged.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 6.0]);
    }

    #[test]
    fn test_sample_json_is_camel_case() {
        let json = serde_json::to_string(&InkSample::new(1.0, 2.0, 3, 4)).unwrap();
        assert!(json.contains("timestampMs"));
    }
}
