//! Wire contracts exchanged with host bridges.
//!
//! Field names are camelCase on the wire. Contracts stay dumb: validation and
//! conversion to domain types live in [`crate::core::adapters`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphTemplateV1 {
    pub id: String,
    pub strokes: Vec<StrokeTemplateV1>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeTemplateV1 {
    pub id: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub points: Vec<[f32; 2]>,
    /// Defaults to the first point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<[f32; 2]>,
    /// Defaults to the last point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InkSampleV1 {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub stroke: u32,
}

/// One validation request: finished ink plus the stroke still being drawn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InkBatchV1 {
    #[serde(default)]
    pub committed: Vec<InkSampleV1>,
    #[serde(default)]
    pub live: Vec<InkSampleV1>,
}
