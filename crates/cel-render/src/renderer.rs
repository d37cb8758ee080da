//! Main renderer implementation

use crate::camera::CameraData;
use crate::features::{Feature, FeatureRegistry};
use crate::graph::CommandBuffer;
use crate::scene::{CullResults, FrameData, FrameTargets, LightData};
use crate::Result;

/// Main renderer configuration
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    pub features: FeatureRegistry,
}

impl RendererConfig {
    pub fn new(width: u32, height: u32, features: FeatureRegistry) -> Self {
        Self {
            width,
            height,
            features,
        }
    }
}

/// Counters for the last recorded frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub passes: usize,
    pub draws: usize,
    pub uniform_writes: usize,
    pub globals_published: usize,
}

impl FrameStats {
    pub fn from_commands(cmd: &CommandBuffer) -> Self {
        Self {
            passes: cmd.pass_names().len(),
            draws: cmd.draws().count(),
            uniform_writes: cmd.uniform_writes(),
            globals_published: cmd.global_textures().count(),
        }
    }
}

/// Record and execute one frame of every active feature
///
/// Pure function of the registry and the frame: the same inputs always
/// produce the same command buffer.
pub fn record_frame(features: &FeatureRegistry, frame: &FrameData) -> Result<CommandBuffer> {
    let graph = features.record_frame(frame)?;
    graph.execute()
}

/// Owns the feature registry and the frame counter
pub struct Renderer {
    features: FeatureRegistry,
    targets: FrameTargets,
    frame_count: u64,
    last_stats: FrameStats,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Result<Self> {
        log::info!("Creating cel renderer");
        log::info!("  Resolution: {}x{}", config.width, config.height);

        let mut features = config.features;
        features.create_all()?;

        Ok(Self {
            features,
            targets: FrameTargets::new(config.width, config.height),
            frame_count: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Enable a feature at runtime
    pub fn enable_feature(&mut self, name: &str) -> Result<()> {
        self.features.enable(name)?;
        log::info!("Enabled feature: {}", name);
        Ok(())
    }

    /// Disable a feature at runtime
    pub fn disable_feature(&mut self, name: &str) -> Result<()> {
        self.features.disable(name)?;
        log::info!("Disabled feature: {}", name);
        Ok(())
    }

    pub fn feature(&self, name: &str) -> Option<&dyn Feature> {
        self.features.get(name)
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut FeatureRegistry {
        &mut self.features
    }

    /// Record a frame against the renderer's targets
    pub fn render(&mut self, camera: CameraData, lights: LightData, cull: CullResults) -> Result<CommandBuffer> {
        let frame = FrameData {
            frame: self.frame_count,
            camera,
            lights,
            cull,
            targets: self.targets.clone(),
        };
        self.render_frame(&frame)
    }

    /// Record a frame the host assembled itself
    pub fn render_frame(&mut self, frame: &FrameData) -> Result<CommandBuffer> {
        log::trace!("Rendering frame {}", self.frame_count);
        let cmd = record_frame(&self.features, frame)?;
        self.last_stats = FrameStats::from_commands(&cmd);
        self.frame_count += 1;
        Ok(cmd)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!("Resizing renderer to {}x{}", width, height);
        self.targets = FrameTargets::new(width, height);
    }

    pub fn targets(&self) -> &FrameTargets {
        &self.targets
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::HairShadowFeature;
    use crate::material::Material;
    use crate::scene::Renderable;

    fn renderer() -> Renderer {
        let features = FeatureRegistry::builder()
            .with_feature(HairShadowFeature::new().with_material(Material::new("HairShadow", vec!["P0".into()])))
            .build()
            .unwrap();
        Renderer::new(RendererConfig::new(320, 200, features)).unwrap()
    }

    #[test]
    fn counts_frames_and_records_stats() {
        let mut renderer = renderer();
        let cull = CullResults::new(vec![Renderable::new(0, "Hair", 2000, 0)]);
        renderer
            .render(CameraData::default(), LightData::default(), cull.clone())
            .unwrap();
        renderer.render(CameraData::default(), LightData::default(), cull).unwrap();

        assert_eq!(renderer.frame_count(), 2);
        assert_eq!(
            renderer.last_stats(),
            FrameStats {
                passes: 1,
                draws: 1,
                uniform_writes: 5,
                globals_published: 0,
            }
        );
    }

    #[test]
    fn disabled_feature_records_nothing() {
        let mut renderer = renderer();
        renderer.disable_feature("hair_shadow").unwrap();
        let cmd = renderer
            .render(CameraData::default(), LightData::default(), CullResults::default())
            .unwrap();
        assert!(cmd.is_empty());
        assert_eq!(renderer.last_stats(), FrameStats::default());
    }

    #[test]
    fn resize_updates_targets() {
        let mut renderer = renderer();
        renderer.resize(640, 360);
        assert_eq!(renderer.targets().color.width, 640);
        assert_eq!(renderer.targets().depth.height, 360);
    }
}
