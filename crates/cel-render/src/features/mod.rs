//! Render features
//!
//! Features are modular rendering components that can be enabled/disabled at
//! runtime. Each one:
//!
//! 1. Builds its passes from static settings in `create()`
//! 2. Enqueues them every frame its material is assigned
//! 3. Drops them again in `dispose()`

mod context;
mod registry;
mod traits;
pub mod bang_shadow;
pub mod hair_shadow;
pub mod rim_light;

pub use bang_shadow::{BangShadowFeature, BangShadowSettings};
pub use context::PassQueue;
pub use hair_shadow::{HairShadowFeature, HairShadowSettings};
pub use registry::{FeatureRegistry, FeatureRegistryBuilder, FeatureState};
pub use rim_light::{RimLightFeature, RimLightSettings};
pub use traits::{AsAny, Feature};

use crate::material::MaterialHandle;
use crate::{Error, Result};

/// Queue bounds a feature accepts from its settings
pub const FEATURE_QUEUE_MIN: i32 = 1000;
pub const FEATURE_QUEUE_MAX: i32 = 5000;

fn clamp_queue(queue: i32) -> i32 {
    queue.clamp(FEATURE_QUEUE_MIN, FEATURE_QUEUE_MAX)
}

fn require_passes(feature: &str, material: &MaterialHandle, count: u32) -> Result<()> {
    if material.pass_count() < count {
        return Err(Error::Feature(format!(
            "Feature '{}' needs a material with {} pass(es), '{}' has {}",
            feature,
            count,
            material.name(),
            material.pass_count()
        )));
    }
    Ok(())
}
