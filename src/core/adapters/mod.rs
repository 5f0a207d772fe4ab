//! Adapters between wire contracts and domain types.

use crate::core::contracts::{GlyphTemplateV1, InkBatchV1, InkSampleV1, StrokeTemplateV1};
use crate::core::errors::CoreError;
use crate::geometry::Point;
use crate::input::InkSample;
use crate::template::{GlyphTemplate, Stroke};

fn point_from_pair(pair: [f32; 2], what: &str) -> Result<Point, CoreError> {
    let point = Point::from(pair);
    if !point.is_finite() {
        return Err(CoreError::InvalidInput(format!(
            "non-finite coordinate in {}",
            what
        )));
    }
    Ok(point)
}

fn stroke_from_contract(stroke: &StrokeTemplateV1) -> Result<Stroke, CoreError> {
    let points = stroke
        .points
        .iter()
        .map(|p| point_from_pair(*p, &stroke.id))
        .collect::<Result<Vec<_>, _>>()?;

    let start = match stroke.start {
        Some(pair) => Some(point_from_pair(pair, &stroke.id)?),
        None => points.first().copied(),
    };
    let end = match stroke.end {
        Some(pair) => Some(point_from_pair(pair, &stroke.id)?),
        None => points.last().copied(),
    };

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        (Some(only), None) | (None, Some(only)) => (only, only),
        (None, None) => {
            return Err(CoreError::InvalidInput(format!(
                "stroke '{}' has no geometry",
                stroke.id
            )))
        }
    };

    Ok(Stroke {
        id: stroke.id.clone(),
        order: stroke.order,
        points,
        start,
        end,
    })
}

pub fn glyph_from_contract(glyph: &GlyphTemplateV1) -> Result<GlyphTemplate, CoreError> {
    if glyph.strokes.is_empty() {
        return Err(CoreError::EmptyTemplate(glyph.id.clone()));
    }

    let strokes = glyph
        .strokes
        .iter()
        .map(stroke_from_contract)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GlyphTemplate::new(glyph.id.clone(), strokes))
}

pub fn glyph_to_contract(glyph: &GlyphTemplate) -> GlyphTemplateV1 {
    GlyphTemplateV1 {
        id: glyph.id.clone(),
        strokes: glyph
            .strokes
            .iter()
            .map(|s| StrokeTemplateV1 {
                id: s.id.clone(),
                order: s.order,
                points: s.points.iter().map(|p| [p.x, p.y]).collect(),
                start: Some([s.start.x, s.start.y]),
                end: Some([s.end.x, s.end.y]),
            })
            .collect(),
    }
}

/// Non-finite samples are rejected rather than silently dropped
pub fn samples_from_contract(samples: &[InkSampleV1]) -> Result<Vec<InkSample>, CoreError> {
    samples
        .iter()
        .map(|s| {
            let sample = InkSample::new(s.x, s.y, s.timestamp_ms, s.stroke);
            if sample.point().is_finite() {
                Ok(sample)
            } else {
                Err(CoreError::InvalidInput(format!(
                    "non-finite ink sample at {}ms",
                    s.timestamp_ms
                )))
            }
        })
        .collect()
}

/// Decode a batch into (committed, live) sample lists
pub fn batch_from_contract(batch: &InkBatchV1) -> Result<(Vec<InkSample>, Vec<InkSample>), CoreError> {
    Ok((
        samples_from_contract(&batch.committed)?,
        samples_from_contract(&batch.live)?,
    ))
}
