//! Polyline segments with cumulative arc length

use super::{Point, LENGTH_EPSILON};

/// One edge of a polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// Euclidean length of this edge
    pub length: f32,
    /// Sum of the lengths of all prior edges in the same polyline
    pub cumulative_length: f32,
}

impl Segment {
    pub fn is_degenerate(&self) -> bool {
        self.length <= LENGTH_EPSILON
    }
}

/// A reference polyline prepared for arc-length queries.
///
/// Segments are contiguous and their cumulative lengths are non-decreasing;
/// `total_length` is the sum of all segment lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePath {
    segments: Vec<Segment>,
    total_length: f32,
    /// First point, used when every segment is degenerate
    anchor: Option<Point>,
}

impl PolylinePath {
    pub fn new(points: &[Point]) -> Self {
        let mut segments = Vec::with_capacity(points.len().saturating_sub(1));
        let mut total_length = 0.0;

        for w in points.windows(2) {
            let length = w[0].distance(w[1]);
            segments.push(Segment {
                start: w[0],
                end: w[1],
                length,
                cumulative_length: total_length,
            });
            total_length += length;
        }

        Self {
            segments,
            total_length,
            anchor: points.first().copied(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// True for empty, single-point, and zero-length ("dot") paths
    pub fn is_degenerate(&self) -> bool {
        self.segments.is_empty() || self.total_length <= LENGTH_EPSILON
    }

    /// Convert a physical arc length into normalized progress
    pub fn normalize(&self, length: f32) -> f32 {
        if self.total_length <= LENGTH_EPSILON {
            0.0
        } else {
            length / self.total_length
        }
    }
}

/// Insert evenly spaced points so no edge is longer than `max_step`.
/// Original vertices are kept, so the traced shape is unchanged.
pub fn densify(points: &[Point], max_step: f32) -> Vec<Point> {
    if points.len() < 2 || !max_step.is_finite() || max_step <= LENGTH_EPSILON {
        return points.to_vec();
    }

    let mut dense = Vec::with_capacity(points.len());
    dense.push(points[0]);
    for w in points.windows(2) {
        let pieces = (w[0].distance(w[1]) / max_step).ceil().max(1.0) as usize;
        for i in 1..=pieces {
            dense.push(if i == pieces {
                w[1]
            } else {
                w[0].lerp(w[1], i as f32 / pieces as f32)
            });
        }
    }
    dense
}
