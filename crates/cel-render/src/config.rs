//! Renderer configuration assets
//!
//! A [`RendererAsset`] lists the features a renderer runs, with their
//! settings, as JSON:
//!
//! ```json
//! {
//!   "features": [
//!     {
//!       "name": "hair_shadow",
//!       "active": true,
//!       "material": "HairShadow",
//!       "settings": { "type": "hair_shadow", "offset": 0.03, "hair_layer": 8 }
//!     }
//!   ]
//! }
//! ```
//!
//! Materials are named and resolved against a [`MaterialLibrary`]. A name
//! the library does not know leaves the feature without a material, so it
//! never draws.

use crate::features::{
    BangShadowFeature, BangShadowSettings, Feature, FeatureRegistry, HairShadowFeature,
    HairShadowSettings, RimLightFeature, RimLightSettings,
};
use crate::material::{MaterialHandle, MaterialLibrary};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Feature settings, tagged by feature type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureSettings {
    HairShadow(HairShadowSettings),
    RimLight(RimLightSettings),
    BangShadow(BangShadowSettings),
}

impl FeatureSettings {
    fn default_name(&self) -> &'static str {
        match self {
            FeatureSettings::HairShadow(_) => "hair_shadow",
            FeatureSettings::RimLight(_) => "rim_light",
            FeatureSettings::BangShadow(_) => "bang_shadow",
        }
    }
}

fn default_active() -> bool {
    true
}

/// One feature entry of a renderer asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAsset {
    /// Registry name; defaults to the feature type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Material name looked up in the library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    pub settings: FeatureSettings,
}

impl FeatureAsset {
    pub fn new(settings: FeatureSettings) -> Self {
        Self {
            name: None,
            active: true,
            material: None,
            settings,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.settings.default_name())
    }

    fn resolve_material(&self, library: &MaterialLibrary) -> Option<MaterialHandle> {
        let name = self.material.as_deref()?;
        let material = library.get(name);
        if material.is_none() {
            log::warn!(
                "Feature '{}' references unknown material '{}'; it will not draw",
                self.name(),
                name
            );
        }
        material
    }

    /// Instantiate the feature this entry describes
    pub fn instantiate(&self, library: &MaterialLibrary) -> Box<dyn Feature> {
        let name = self.name().to_string();
        let material = self.resolve_material(library);
        match &self.settings {
            FeatureSettings::HairShadow(settings) => Box::new(
                HairShadowFeature::with_settings(HairShadowSettings {
                    material,
                    ..settings.clone()
                })
                .with_name(name),
            ),
            FeatureSettings::RimLight(settings) => Box::new(
                RimLightFeature::with_settings(RimLightSettings {
                    material,
                    ..settings.clone()
                })
                .with_name(name),
            ),
            FeatureSettings::BangShadow(settings) => Box::new(
                BangShadowFeature::with_settings(BangShadowSettings {
                    material,
                    ..settings.clone()
                })
                .with_name(name),
            ),
        }
    }
}

/// Ordered list of the features a renderer runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RendererAsset {
    #[serde(default)]
    pub features: Vec<FeatureAsset>,
}

impl RendererAsset {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register every listed feature; inactive entries stay registered but
    /// disabled
    ///
    /// Features are not created yet; call [`FeatureRegistry::create_all`].
    pub fn build(&self, library: &MaterialLibrary) -> Result<FeatureRegistry> {
        let mut registry = FeatureRegistry::new();
        for asset in &self.features {
            if asset.name().is_empty() {
                return Err(Error::Config("Feature name must not be empty".to_string()));
            }
            registry.register(asset.instantiate(library))?;
            if !asset.active {
                registry.disable(asset.name())?;
            }
        }
        log::info!("Renderer asset loaded with {} features", registry.len());
        Ok(registry)
    }
}
