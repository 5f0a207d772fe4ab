//! Tracecheck - checkpoint-based stroke order and direction validation
//!
//! Glyph templates are split into checkpoints along their arc length; ink is
//! replayed against them in timestamp order to decide whether a learner wrote
//! each stroke in the right order and direction.

pub mod checkpoint;
pub mod core;
pub mod feedback;
pub mod geometry;
pub mod input;
pub mod profile;
pub mod session;
pub mod template;
pub mod validator;

pub use checkpoint::{CheckpointPlan, PlanCache};
pub use crate::core::errors::CoreError;
pub use input::InkSample;
pub use profile::{DifficultyProfile, DifficultyTier, RowScale, ValidatorConfig};
pub use session::TraceSession;
pub use template::{GlyphTemplate, Stroke};
pub use validator::{validate, validate_with_coverage, FailureReason, ValidationResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Calling this more than once (or
/// after the host installed its own subscriber) is harmless.
pub fn init_tracing() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracecheck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Tracecheck initialized");
    }
}
