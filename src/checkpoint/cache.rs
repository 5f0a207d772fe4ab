//! Plan cache keyed by template geometry and checkpoint configuration
//!
//! Plans are immutable, so one built plan can serve every evaluation for the
//! same laid-out template until the row scale or difficulty tier changes.
//! The key fingerprints the laid-out geometry (SHA-256 over stroke ids, draw
//! orders and coordinates), so moving a template to another row never hits a
//! stale plan.

use indexmap::IndexMap;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::CheckpointPlan;
use crate::profile::ValidatorConfig;
use crate::template::GlyphTemplate;

/// Default number of plans kept before the oldest is evicted
const DEFAULT_CAPACITY: usize = 64;

/// Identity of a plan: template geometry plus checkpoint/spacing lengths
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub template_id: String,
    pub geometry_hash: String,
    checkpoint_length_bits: u32,
    spacing_length_bits: u32,
}

impl PlanKey {
    pub fn new(template: &GlyphTemplate, checkpoint_length: f32, spacing_length: f32) -> Self {
        let mut hasher = Sha256::new();
        for stroke in &template.strokes {
            hasher.update(stroke.id.as_bytes());
            hasher.update(stroke.order.to_le_bytes());
            for p in stroke.points.iter().chain([&stroke.start, &stroke.end]) {
                hasher.update(p.x.to_bits().to_le_bytes());
                hasher.update(p.y.to_bits().to_le_bytes());
            }
        }
        let geometry_hash = hex::encode(hasher.finalize());

        Self {
            template_id: template.id.clone(),
            geometry_hash,
            checkpoint_length_bits: checkpoint_length.to_bits(),
            spacing_length_bits: spacing_length.to_bits(),
        }
    }

    pub fn for_config(template: &GlyphTemplate, config: &ValidatorConfig) -> Self {
        Self::new(template, config.checkpoint_length, config.spacing_length)
    }
}

/// Bounded, insertion-ordered cache of built plans
#[derive(Debug)]
pub struct PlanCache {
    plans: RwLock<IndexMap<PlanKey, Arc<CheckpointPlan>>>,
    capacity: usize,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            plans: RwLock::new(IndexMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Return the cached plan for this template/config pair, building it on a miss
    pub fn get_or_build(&self, template: &GlyphTemplate, config: &ValidatorConfig) -> Arc<CheckpointPlan> {
        let key = PlanKey::for_config(template, config);

        if let Some(plan) = self.plans.read().get(&key) {
            tracing::debug!("Plan cache hit for '{}'", key.template_id);
            return Arc::clone(plan);
        }

        let plan = Arc::new(CheckpointPlan::for_config(template, config));
        let mut plans = self.plans.write();
        // Another caller may have inserted while we were building
        if let Some(existing) = plans.get(&key) {
            return Arc::clone(existing);
        }
        plans.insert(key, Arc::clone(&plan));
        while plans.len() > self.capacity {
            if let Some((evicted, _)) = plans.shift_remove_index(0) {
                tracing::debug!("Evicted cached plan for '{}'", evicted.template_id);
            }
        }
        plan
    }

    pub fn get(&self, key: &PlanKey) -> Option<Arc<CheckpointPlan>> {
        self.plans.read().get(key).cloned()
    }

    pub fn clear(&self) {
        self.plans.write().clear();
    }

    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}
