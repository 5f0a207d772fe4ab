//! Template geometry - reference strokes of a glyph
//!
//! Templates are authored in a normalized box and are read-only input to the
//! engine. Hosts lay them out into row coordinates with [`GlyphTemplate::laid_out`]
//! before building a checkpoint plan, so templates and ink share one space.

use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;
use crate::geometry::{densify, Point, LENGTH_EPSILON};

/// Edge count a stroke polyline is resampled up to
pub const MIN_POLYLINE_EDGES: usize = 64;

/// A single continuous reference pen path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Stable identifier, reported back in checkpoint statuses
    pub id: String,
    /// Draw order within the glyph (ascending)
    pub order: i32,
    /// Sampled points along the path
    pub points: Vec<Point>,
    /// Explicit start point (may differ slightly from `points[0]`)
    pub start: Point,
    /// Explicit end point
    pub end: Point,
}

impl Stroke {
    /// Create a stroke whose start/end are its first/last sampled points
    pub fn from_points(id: impl Into<String>, order: i32, points: Vec<Point>) -> Self {
        let start = points.first().copied().unwrap_or_default();
        let end = points.last().copied().unwrap_or(start);
        Self {
            id: id.into(),
            order,
            points,
            start,
            end,
        }
    }

    /// The polyline used for arc-length work.
    ///
    /// Strokes with fewer than two sampled points fall back to the explicit
    /// start/end pair, which collapses to a single point for dots. The result
    /// is resampled to at least [`MIN_POLYLINE_EDGES`] edges, so sparsely
    /// authored strokes (a straight stem given as two vertices) still carry
    /// points inside every checkpoint.
    pub fn polyline(&self) -> Vec<Point> {
        let raw = if self.points.len() >= 2 {
            self.points.clone()
        } else if self.start == self.end {
            vec![self.start]
        } else {
            vec![self.start, self.end]
        };

        let length: f32 = raw.windows(2).map(|w| w[0].distance(w[1])).sum();
        if length <= LENGTH_EPSILON {
            return raw;
        }
        densify(&raw, length / MIN_POLYLINE_EDGES as f32)
    }

    fn transformed(&self, origin: Point, scale: f32) -> Self {
        let map = |p: Point| Point::new(origin.x + p.x * scale, origin.y + p.y * scale);
        Self {
            id: self.id.clone(),
            order: self.order,
            points: self.points.iter().copied().map(map).collect(),
            start: map(self.start),
            end: map(self.end),
        }
    }
}

/// Reference geometry for one glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphTemplate {
    pub id: String,
    pub strokes: Vec<Stroke>,
}

impl GlyphTemplate {
    pub fn new(id: impl Into<String>, strokes: Vec<Stroke>) -> Self {
        Self {
            id: id.into(),
            strokes,
        }
    }

    /// Decode a template from its JSON contract
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let contract: crate::core::contracts::GlyphTemplateV1 = serde_json::from_str(json)?;
        crate::core::adapters::glyph_from_contract(&contract)
    }

    /// Strokes sorted by draw order; equal orders keep their listed order
    pub fn ordered_strokes(&self) -> Vec<&Stroke> {
        let mut strokes: Vec<&Stroke> = self.strokes.iter().collect();
        strokes.sort_by_key(|s| s.order);
        strokes
    }

    /// Map normalized template coordinates into layout space
    pub fn laid_out(&self, origin: Point, scale: f32) -> Self {
        Self {
            id: self.id.clone(),
            strokes: self
                .strokes
                .iter()
                .map(|s| s.transformed(origin, scale))
                .collect(),
        }
    }
}
