//! Bang shadow feature
//!
//! Renders a black-cleared mask of the hair clipped by the face depth and
//! publishes it for the face shader.

use super::{clamp_queue, require_passes, PassQueue};
use crate::features::Feature;
use crate::filter::{FilterConfig, LayerMask, RenderQueueRange};
use crate::material::MaterialHandle;
use crate::passes::{BangShadowPass, RenderPassEvent};
use crate::scene::FrameData;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Bang shadow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BangShadowSettings {
    pub event: RenderPassEvent,
    pub hair_layer: LayerMask,
    pub face_layer: LayerMask,
    pub queue_min: i32,
    pub queue_max: i32,
    /// Needs two sub-passes: face depth, then hair solid colour
    #[serde(skip)]
    pub material: Option<MaterialHandle>,
}

impl BangShadowSettings {
    fn queue(&self) -> RenderQueueRange {
        RenderQueueRange::new(clamp_queue(self.queue_min), clamp_queue(self.queue_max))
    }

    pub fn face_filter(&self) -> FilterConfig {
        FilterConfig::new(self.queue(), self.face_layer)
    }

    pub fn hair_filter(&self) -> FilterConfig {
        FilterConfig::new(self.queue(), self.hair_layer)
    }
}

impl Default for BangShadowSettings {
    fn default() -> Self {
        Self {
            event: RenderPassEvent::BeforeRenderingOpaques,
            hair_layer: LayerMask::NONE,
            face_layer: LayerMask::NONE,
            queue_min: 2000,
            queue_max: 3000,
            material: None,
        }
    }
}

/// Bang shadow feature
pub struct BangShadowFeature {
    name: String,
    settings: BangShadowSettings,
    pass: Option<BangShadowPass>,
}

impl BangShadowFeature {
    pub fn new() -> Self {
        Self::with_settings(BangShadowSettings::default())
    }

    pub fn with_settings(settings: BangShadowSettings) -> Self {
        Self {
            name: "bang_shadow".to_string(),
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

    pub fn with_layers(mut self, face: LayerMask, hair: LayerMask) -> Self {
        self.settings.face_layer = face;
        self.settings.hair_layer = hair;
        self
    }

    pub fn settings(&self) -> &BangShadowSettings {
        &self.settings
    }

    /// Changes take effect the next time the feature is created
    pub fn settings_mut(&mut self) -> &mut BangShadowSettings {
        &mut self.settings
    }

    pub fn pass(&self) -> Option<&BangShadowPass> {
        self.pass.as_ref()
    }
}

impl Default for BangShadowFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for BangShadowFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&mut self) -> Result<()> {
        let settings = &self.settings;
        if let Some(material) = &settings.material {
            require_passes(&self.name, material, 2)?;
        } else {
            log::warn!("Bang shadow feature '{}' has no material assigned; it will not draw", self.name);
        }
        if settings.face_layer.is_empty() || settings.hair_layer.is_empty() {
            log::warn!(
                "Bang shadow feature '{}' has an empty layer mask (face {:#x}, hair {:#x})",
                self.name,
                settings.face_layer.0,
                settings.hair_layer.0
            );
        }

        log::info!("Bang shadow feature '{}' created", self.name);

        self.pass = Some(BangShadowPass::new(
            settings.event,
            settings.face_filter(),
            settings.hair_filter(),
            settings.material.clone(),
        ));
        Ok(())
    }

    fn add_render_passes<'a>(&'a self, queue: &mut PassQueue<'a>, frame: &FrameData) {
        match &self.pass {
            Some(pass) if pass.has_material() => queue.enqueue(pass),
            Some(_) => log::debug!("Bang shadow '{}': no material, skipped frame {}", self.name, frame.frame),
            None => log::debug!("Bang shadow '{}': not created, skipped frame {}", self.name, frame.frame),
        }
    }

    fn dispose(&mut self) {
        if self.pass.take().is_some() {
            log::info!("Bang shadow feature '{}' disposed", self.name);
        }
    }
}
