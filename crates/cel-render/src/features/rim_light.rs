//! Rim light feature

use super::{require_passes, PassQueue};
use crate::draw_list::ShaderTagId;
use crate::features::Feature;
use crate::filter::LayerMask;
use crate::material::MaterialHandle;
use crate::passes::{RenderPassEvent, RimLightPass};
use crate::scene::FrameData;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Rim light settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RimLightSettings {
    pub event: RenderPassEvent,
    pub layer_mask: LayerMask,
    /// Light-mode tag a renderer must provide to receive the rim
    pub light_mode_tag: String,
    /// Opaque queues with opaque sorting; otherwise every queue back-to-front
    pub only_opaque: bool,
    #[serde(skip)]
    pub material: Option<MaterialHandle>,
}

impl Default for RimLightSettings {
    fn default() -> Self {
        Self {
            event: RenderPassEvent::AfterRenderingOpaques,
            layer_mask: LayerMask::ALL,
            light_mode_tag: ShaderTagId::UNIVERSAL_FORWARD.as_str().to_string(),
            only_opaque: true,
            material: None,
        }
    }
}

/// Rim light feature
pub struct RimLightFeature {
    name: String,
    settings: RimLightSettings,
    pass: Option<RimLightPass>,
}

impl RimLightFeature {
    pub fn new() -> Self {
        Self::with_settings(RimLightSettings::default())
    }

    pub fn with_settings(settings: RimLightSettings) -> Self {
        Self {
            name: "rim_light".to_string(),
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

    pub fn with_layer_mask(mut self, layer_mask: LayerMask) -> Self {
        self.settings.layer_mask = layer_mask;
        self
    }

    pub fn settings(&self) -> &RimLightSettings {
        &self.settings
    }

    /// Changes take effect the next time the feature is created
    pub fn settings_mut(&mut self) -> &mut RimLightSettings {
        &mut self.settings
    }

    pub fn pass(&self) -> Option<&RimLightPass> {
        self.pass.as_ref()
    }
}

impl Default for RimLightFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for RimLightFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&mut self) -> Result<()> {
        let settings = &self.settings;
        if let Some(material) = &settings.material {
            require_passes(&self.name, material, 1)?;
        } else {
            log::warn!("Rim light feature '{}' has no material assigned; it will not draw", self.name);
        }

        log::info!(
            "Rim light feature '{}' created (tag '{}', only_opaque={})",
            self.name,
            settings.light_mode_tag,
            settings.only_opaque
        );

        self.pass = Some(RimLightPass::new(
            settings.event,
            settings.layer_mask,
            ShaderTagId::new(settings.light_mode_tag.clone()),
            settings.only_opaque,
            settings.material.clone(),
        ));
        Ok(())
    }

    fn add_render_passes<'a>(&'a self, queue: &mut PassQueue<'a>, frame: &FrameData) {
        match &self.pass {
            Some(pass) if pass.has_material() => queue.enqueue(pass),
            Some(_) => log::debug!("Rim light '{}': no material, skipped frame {}", self.name, frame.frame),
            None => log::debug!("Rim light '{}': not created, skipped frame {}", self.name, frame.frame),
        }
    }

    fn dispose(&mut self) {
        if self.pass.take().is_some() {
            log::info!("Rim light feature '{}' disposed", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_draw_opaque_universal_forward() {
        let settings = RimLightSettings::default();
        assert_eq!(settings.light_mode_tag, "UniversalForward");
        assert!(settings.only_opaque);
        assert_eq!(settings.layer_mask, LayerMask::ALL);
        assert_eq!(settings.event, RenderPassEvent::AfterRenderingOpaques);
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: RimLightSettings = serde_json::from_str(r#"{ "only_opaque": false }"#).unwrap();
        assert!(!settings.only_opaque);
        assert_eq!(settings.light_mode_tag, "UniversalForward");
    }
}
