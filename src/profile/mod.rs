//! Difficulty profiles and validator configuration
//!
//! A [`DifficultyProfile`] holds tier constants relative to row height. The
//! concrete [`ValidatorConfig`] is recomputed whenever the row scale or the
//! tier changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::CoreError;
use crate::feedback::HapticStyle;

/// Skill tier selecting how lenient validation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DifficultyTier {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Expert,
    ];

    pub fn profile(self) -> DifficultyProfile {
        DifficultyProfile::for_tier(self)
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Expert => "expert",
        };
        f.write_str(name)
    }
}

impl FromStr for DifficultyTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(DifficultyTier::Beginner),
            "intermediate" => Ok(DifficultyTier::Intermediate),
            "expert" => Ok(DifficultyTier::Expert),
            _ => Err(CoreError::UnknownTier(s.to_string())),
        }
    }
}

/// Tier constants; lengths are fractions of the row height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProfile {
    pub tier: DifficultyTier,
    /// Corridor radius as a fraction of row height
    pub corridor_radius: f32,
    /// Checkpoint span as a fraction of row height
    pub checkpoint_length: f32,
    /// Gap between checkpoints as a fraction of row height
    pub spacing_length: f32,
    /// Minimum in-corridor sample ratio (0.0 - 1.0)
    pub coverage_threshold: f32,
    /// Maximum far-outside sample ratio (0.0 - 1.0)
    pub outside_allowance: f32,
    /// Minimum time between two warning feedbacks
    pub warning_cooldown_ms: u64,
    /// Feedback played when checkpoints complete
    pub haptic_style: HapticStyle,
}

impl DifficultyProfile {
    pub fn for_tier(tier: DifficultyTier) -> Self {
        match tier {
            DifficultyTier::Beginner => Self {
                tier,
                corridor_radius: 0.16,
                checkpoint_length: 0.12,
                spacing_length: 0.06,
                coverage_threshold: 0.55,
                outside_allowance: 0.35,
                warning_cooldown_ms: 1500,
                haptic_style: HapticStyle::Soft,
            },
            DifficultyTier::Intermediate => Self {
                tier,
                corridor_radius: 0.12,
                checkpoint_length: 0.10,
                spacing_length: 0.05,
                coverage_threshold: 0.65,
                outside_allowance: 0.25,
                warning_cooldown_ms: 1200,
                haptic_style: HapticStyle::Soft,
            },
            DifficultyTier::Expert => Self {
                tier,
                corridor_radius: 0.08,
                checkpoint_length: 0.08,
                spacing_length: 0.04,
                coverage_threshold: 0.75,
                outside_allowance: 0.15,
                warning_cooldown_ms: 1000,
                haptic_style: HapticStyle::None,
            },
        }
    }

    /// Decode a profile override from JSON
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::for_tier(DifficultyTier::default())
    }
}

/// Physical scale of the active writing row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowScale {
    pub row_height: f32,
    /// Radius of the visual start dot drawn on the row
    pub dot_radius: f32,
}

impl Default for RowScale {
    fn default() -> Self {
        Self {
            row_height: 100.0,
            dot_radius: 4.0,
        }
    }
}

/// Concrete validation parameters in layout units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Maximum distance from the reference path for a sample to count
    pub corridor_radius: f32,
    pub checkpoint_length: f32,
    pub spacing_length: f32,
    pub coverage_threshold: f32,
    pub outside_allowance: f32,
    /// Width of the caller's ink stroke
    pub ink_width: f32,
    /// Largest jump between samples of one ink stroke that gets filled in
    /// (0 disables gap filling)
    pub max_gap_fill: f32,
}

impl ValidatorConfig {
    /// Corridor never shrinks below this multiple of the dot radius
    const MIN_CORRIDOR_DOT_RATIO: f32 = 1.5;

    pub fn for_row(profile: &DifficultyProfile, scale: RowScale, ink_width: f32) -> Self {
        let row_height = scale.row_height.max(0.0);
        let checkpoint_length = profile.checkpoint_length * row_height;
        let spacing_length = profile.spacing_length * row_height;

        Self {
            corridor_radius: (profile.corridor_radius * row_height)
                .max(scale.dot_radius * Self::MIN_CORRIDOR_DOT_RATIO),
            checkpoint_length,
            spacing_length,
            coverage_threshold: profile.coverage_threshold.clamp(0.0, 1.0),
            outside_allowance: profile.outside_allowance.clamp(0.0, 1.0),
            ink_width: ink_width.max(0.0),
            max_gap_fill: 2.0 * (checkpoint_length + spacing_length),
        }
    }

    /// Configuration for a tier on a given row
    pub fn for_tier(tier: DifficultyTier, scale: RowScale, ink_width: f32) -> Self {
        Self::for_row(&tier.profile(), scale, ink_width)
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::for_tier(DifficultyTier::default(), RowScale::default(), 6.0)
    }
}
