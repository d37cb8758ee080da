//! Feature registry for managing features

use super::{Feature, PassQueue};
use crate::graph::RenderGraph;
use crate::scene::FrameData;
use crate::{Error, Result};

/// Where a feature is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureState {
    /// Registered, `create()` not yet called
    Uninitialized,
    /// Created and able to enqueue passes
    Created,
    /// Disposed after being disabled; enabling creates it again
    TornDown,
}

struct FeatureSlot {
    feature: Box<dyn Feature>,
    state: FeatureState,
    enabled: bool,
}

/// Registry for managing features
///
/// Features keep their registration order, which breaks ties between passes
/// injected at the same event.
pub struct FeatureRegistry {
    features: Vec<FeatureSlot>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    /// Create a builder for fluent API
    pub fn builder() -> FeatureRegistryBuilder {
        FeatureRegistryBuilder::new()
    }

    /// Register a feature, enabled
    pub fn register(&mut self, feature: Box<dyn Feature>) -> Result<()> {
        if self.slot(feature.name()).is_some() {
            return Err(Error::Feature(format!(
                "Feature '{}' already registered",
                feature.name()
            )));
        }
        log::debug!("Registered feature '{}'", feature.name());
        self.features.push(FeatureSlot {
            feature,
            state: FeatureState::Uninitialized,
            enabled: true,
        });
        Ok(())
    }

    fn slot(&self, name: &str) -> Option<&FeatureSlot> {
        self.features.iter().find(|s| s.feature.name() == name)
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut FeatureSlot> {
        self.features
            .iter_mut()
            .find(|s| s.feature.name() == name)
            .ok_or_else(|| Error::Feature(format!("Feature '{}' not found", name)))
    }

    fn create_slot(slot: &mut FeatureSlot) -> Result<()> {
        slot.feature.create()?;
        slot.state = FeatureState::Created;
        Ok(())
    }

    /// Create every enabled feature that is not created yet
    pub fn create_all(&mut self) -> Result<()> {
        for slot in self.features.iter_mut() {
            if slot.enabled && slot.state != FeatureState::Created {
                Self::create_slot(slot)?;
            }
        }
        log::info!(
            "{} of {} features active",
            self.features.iter().filter(|s| s.state == FeatureState::Created).count(),
            self.features.len()
        );
        Ok(())
    }

    /// Enable a feature, creating it from its settings if needed
    pub fn enable(&mut self, name: &str) -> Result<()> {
        let slot = self.slot_mut(name)?;
        if slot.state != FeatureState::Created {
            Self::create_slot(slot)?;
        }
        slot.enabled = true;
        Ok(())
    }

    /// Disable a feature and tear it down
    pub fn disable(&mut self, name: &str) -> Result<()> {
        let slot = self.slot_mut(name)?;
        slot.enabled = false;
        if slot.state == FeatureState::Created {
            slot.feature.dispose();
            slot.state = FeatureState::TornDown;
        }
        Ok(())
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.slot(name).map(|s| s.enabled).unwrap_or(false)
    }

    pub fn state(&self, name: &str) -> Option<FeatureState> {
        self.slot(name).map(|s| s.state)
    }

    /// Get a feature by name
    pub fn get(&self, name: &str) -> Option<&dyn Feature> {
        self.slot(name).map(|s| &*s.feature)
    }

    /// Get a specific feature by type
    pub fn get_typed<T: Feature + 'static>(&self, name: &str) -> Option<&T> {
        self.slot(name)
            .and_then(|s| s.feature.as_any().downcast_ref::<T>())
    }

    /// Get a mutable reference to a specific feature by type
    pub fn get_typed_mut<T: Feature + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.features
            .iter_mut()
            .find(|s| s.feature.name() == name)
            .and_then(|s| s.feature.as_any_mut().downcast_mut::<T>())
    }

    /// Feature names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|s| s.feature.name())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Collect this frame's passes from every active feature and record them
    /// into a compiled graph
    pub fn record_frame(&self, frame: &FrameData) -> Result<RenderGraph> {
        let mut queue = PassQueue::new();
        for slot in &self.features {
            if slot.enabled && slot.state == FeatureState::Created {
                slot.feature.add_render_passes(&mut queue, frame);
            }
        }
        log::trace!("Frame {}: {} passes enqueued", frame.frame, queue.len());

        let mut graph = RenderGraph::new(&frame.targets);
        for pass in queue.into_sorted() {
            pass.record(&mut graph, frame)?;
        }
        graph.compile()?;
        Ok(graph)
    }

    /// Dispose every created feature
    pub fn dispose_all(&mut self) {
        for slot in self.features.iter_mut() {
            if slot.state == FeatureState::Created {
                slot.feature.dispose();
                slot.state = FeatureState::TornDown;
            }
        }
    }
}

impl Drop for FeatureRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

/// Builder for FeatureRegistry
pub struct FeatureRegistryBuilder {
    features: Vec<Box<dyn Feature>>,
}

impl FeatureRegistryBuilder {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// Add a feature to the registry
    pub fn with_feature(mut self, feature: impl Feature + 'static) -> Self {
        self.features.push(Box::new(feature));
        self
    }

    /// Build the registry
    pub fn build(self) -> Result<FeatureRegistry> {
        let mut registry = FeatureRegistry::new();

        for feature in self.features {
            registry.register(feature)?;
        }

        Ok(registry)
    }
}

impl Default for FeatureRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{BangShadowFeature, HairShadowFeature, RimLightFeature};
    use crate::filter::LayerMask;
    use crate::material::Material;
    use crate::passes::{RenderPassEvent, ScriptablePass};
    use crate::scene::{FrameTargets, Renderable};
    use crate::CameraData;

    fn frame() -> FrameData {
        FrameData::new(0, CameraData::default(), FrameTargets::new(32, 32))
            .with_visible(vec![Renderable::new(0, "Hair", 2000, 0)])
    }

    fn registry() -> FeatureRegistry {
        FeatureRegistry::builder()
            .with_feature(
                HairShadowFeature::new().with_material(Material::new("HairShadow", vec!["P0".into()])),
            )
            .with_feature(RimLightFeature::new().with_material(Material::new("Rim", vec!["P0".into()])))
            .with_feature(
                BangShadowFeature::new()
                    .with_layers(LayerMask::ALL, LayerMask::ALL)
                    .with_material(Material::new("Bang", vec!["P0".into(), "P1".into()])),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = FeatureRegistry::builder()
            .with_feature(RimLightFeature::new())
            .with_feature(RimLightFeature::new())
            .build();
        assert!(matches!(result, Err(Error::Feature(_))));
    }

    #[test]
    fn passes_record_in_event_order() {
        let mut registry = registry();
        registry.create_all().unwrap();
        let graph = registry.record_frame(&frame()).unwrap();
        // bang (BeforeRenderingOpaques) < rim (AfterRenderingOpaques) < hair (BeforeRenderingTransparents)
        assert_eq!(graph.execution_order(), vec!["bang_shadow", "rim_light", "hair_shadow"]);
    }

    #[test]
    fn same_event_keeps_registration_order() {
        let mut registry = FeatureRegistry::builder()
            .with_feature(
                RimLightFeature::new()
                    .with_name("rim_b")
                    .with_material(Material::new("RimB", vec!["P0".into()])),
            )
            .with_feature(
                HairShadowFeature::new()
                    .with_material(Material::new("Hair", vec!["P0".into()])),
            )
            .build()
            .unwrap();
        registry
            .get_typed_mut::<HairShadowFeature>("hair_shadow")
            .unwrap()
            .settings_mut()
            .event = RenderPassEvent::AfterRenderingOpaques;
        registry.create_all().unwrap();

        let graph = registry.record_frame(&frame()).unwrap();
        assert_eq!(graph.execution_order(), vec!["rim_light", "hair_shadow"]);
    }

    #[test]
    fn disable_tears_down_and_enable_recreates() {
        let mut registry = registry();
        registry.create_all().unwrap();

        registry.disable("rim_light").unwrap();
        assert_eq!(registry.state("rim_light"), Some(FeatureState::TornDown));
        assert!(!registry.is_enabled("rim_light"));
        assert!(registry.get_typed::<RimLightFeature>("rim_light").unwrap().pass().is_none());
        let graph = registry.record_frame(&frame()).unwrap();
        assert!(!graph.execution_order().contains(&"rim_light"));

        registry.enable("rim_light").unwrap();
        assert_eq!(registry.state("rim_light"), Some(FeatureState::Created));
        let pass = registry.get_typed::<RimLightFeature>("rim_light").unwrap().pass().unwrap();
        assert_eq!(pass.event(), RenderPassEvent::AfterRenderingOpaques);
    }

    #[test]
    fn failed_enable_leaves_feature_disabled() {
        let mut registry = FeatureRegistry::builder()
            .with_feature(HairShadowFeature::new().with_material(Material::new("Empty", Vec::new())))
            .build()
            .unwrap();
        registry.disable("hair_shadow").unwrap();

        assert!(matches!(registry.enable("hair_shadow"), Err(Error::Feature(_))));
        assert!(!registry.is_enabled("hair_shadow"));
        assert_eq!(registry.state("hair_shadow"), Some(FeatureState::Uninitialized));
    }

    #[test]
    fn uncreated_features_do_not_record() {
        let registry = registry();
        assert_eq!(registry.state("hair_shadow"), Some(FeatureState::Uninitialized));
        let graph = registry.record_frame(&frame()).unwrap();
        assert!(graph.execution_order().is_empty());
    }

    #[test]
    fn unknown_feature_is_an_error() {
        let mut registry = registry();
        assert!(registry.enable("bloom").is_err());
        assert!(registry.get("bloom").is_none());
    }
}
