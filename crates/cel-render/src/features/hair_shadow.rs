//! Hair shadow feature
//!
//! Casts the hair's silhouette onto the face, offset along the main light's
//! screen-space direction and limited to stencil-marked pixels.

use super::{clamp_queue, require_passes, PassQueue};
use crate::features::Feature;
use crate::filter::{FilterConfig, LayerMask, RenderQueueRange};
use crate::material::{Color, CompareFunction, MaterialBinder, MaterialHandle, MAX_SHADOW_OFFSET};
use crate::passes::{HairShadowPass, RenderPassEvent};
use crate::scene::FrameData;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Hair shadow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairShadowSettings {
    pub event: RenderPassEvent,
    /// Shadow tint (default: black)
    pub color: Color,
    /// Screen-space offset (default: 0.02, range: 0.0–0.1)
    pub offset: f32,
    pub stencil_ref: u8,
    pub stencil_compare: CompareFunction,
    pub hair_layer: LayerMask,
    /// Queue bounds, each clamped to 1000–5000; order does not matter
    pub queue_min: i32,
    pub queue_max: i32,
    #[serde(skip)]
    pub material: Option<MaterialHandle>,
}

impl HairShadowSettings {
    pub fn filter(&self) -> FilterConfig {
        FilterConfig::new(
            RenderQueueRange::new(clamp_queue(self.queue_min), clamp_queue(self.queue_max)),
            self.hair_layer,
        )
    }

    pub fn binder(&self) -> MaterialBinder {
        MaterialBinder::new(self.color, self.offset, self.stencil_ref, self.stencil_compare)
    }
}

impl Default for HairShadowSettings {
    fn default() -> Self {
        Self {
            event: RenderPassEvent::BeforeRenderingTransparents,
            color: Color::BLACK,
            offset: 0.02,
            stencil_ref: 128,
            stencil_compare: CompareFunction::Equal,
            hair_layer: LayerMask::ALL,
            queue_min: 2000,
            queue_max: 3000,
            material: None,
        }
    }
}

/// Hair shadow feature
pub struct HairShadowFeature {
    name: String,
    settings: HairShadowSettings,
    pass: Option<HairShadowPass>,
}

impl HairShadowFeature {
    pub fn new() -> Self {
        Self::with_settings(HairShadowSettings::default())
    }

    pub fn with_settings(settings: HairShadowSettings) -> Self {
        Self {
            name: "hair_shadow".to_string(),
            settings,
            pass: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.settings.material = Some(material);
        self
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.settings.offset = offset.clamp(0.0, MAX_SHADOW_OFFSET);
        self
    }

    pub fn with_hair_layer(mut self, layer: LayerMask) -> Self {
        self.settings.hair_layer = layer;
        self
    }

    pub fn settings(&self) -> &HairShadowSettings {
        &self.settings
    }

    /// Changes take effect the next time the feature is created
    pub fn settings_mut(&mut self) -> &mut HairShadowSettings {
        &mut self.settings
    }

    pub fn pass(&self) -> Option<&HairShadowPass> {
        self.pass.as_ref()
    }
}

impl Default for HairShadowFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for HairShadowFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&mut self) -> Result<()> {
        let settings = &self.settings;
        if let Some(material) = &settings.material {
            require_passes(&self.name, material, 1)?;
        } else {
            log::warn!("Hair shadow feature '{}' has no material assigned; it will not draw", self.name);
        }

        let filter = settings.filter();
        let binder = settings.binder();
        log::info!(
            "Hair shadow feature '{}' created (queue {}..={}, offset={:.3}, stencil {} {:?})",
            self.name,
            filter.queue().lower_bound(),
            filter.queue().upper_bound(),
            binder.offset,
            binder.stencil_ref,
            binder.stencil_compare
        );

        self.pass = Some(HairShadowPass::new(settings.event, filter, binder, settings.material.clone()));
        Ok(())
    }

    fn add_render_passes<'a>(&'a self, queue: &mut PassQueue<'a>, frame: &FrameData) {
        match &self.pass {
            Some(pass) if pass.has_material() => queue.enqueue(pass),
            Some(_) => log::debug!("Hair shadow '{}': no material, skipped frame {}", self.name, frame.frame),
            None => log::debug!("Hair shadow '{}': not created, skipped frame {}", self.name, frame.frame),
        }
    }

    fn dispose(&mut self) {
        if self.pass.take().is_some() {
            log::info!("Hair shadow feature '{}' disposed", self.name);
        }
    }
}
