//! Frame data – everything the host hands the pipeline for one frame

use crate::camera::CameraData;
use crate::draw_list::ShaderTagId;
use crate::graph::{TextureDesc, TextureFormat};
use crate::material::Color;
use glam::{Mat4, Quat, Vec3};

/// Identifier of a renderer in the host's scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// A renderer that survived culling this frame
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub id: ObjectId,
    /// Layer index, 0..32
    pub layer: u8,
    pub render_queue: i32,
    pub sorting_layer: i32,
    pub renderer_priority: i32,
    /// World-space bounds centre, used for distance sorting
    pub position: Vec3,
    /// Name of the material the renderer draws with
    pub material: String,
    /// Light-mode tags the renderer's shader provides a pass for
    pub shader_tags: Vec<ShaderTagId>,
}

impl Renderable {
    pub fn new(id: u32, material: impl Into<String>, render_queue: i32, layer: u8) -> Self {
        Self {
            id: ObjectId(id),
            layer,
            render_queue,
            sorting_layer: 0,
            renderer_priority: 0,
            position: Vec3::ZERO,
            material: material.into(),
            shader_tags: vec![ShaderTagId::UNIVERSAL_FORWARD, ShaderTagId::DEPTH_ONLY],
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_shader_tags(mut self, tags: Vec<ShaderTagId>) -> Self {
        self.shader_tags = tags;
        self
    }

    pub fn with_sorting_layer(mut self, sorting_layer: i32) -> Self {
        self.sorting_layer = sorting_layer;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.renderer_priority = priority;
        self
    }

    pub fn has_shader_tag(&self, tag: &ShaderTagId) -> bool {
        self.shader_tags.contains(tag)
    }
}

/// Renderers potentially visible to the current camera
#[derive(Clone, Debug, Default)]
pub struct CullResults {
    pub visible: Vec<Renderable>,
}

impl CullResults {
    pub fn new(visible: Vec<Renderable>) -> Self {
        Self { visible }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// A light that affects the current camera
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleLight {
    /// Local-to-world transform; the third column is the light's forward axis
    pub local_to_world: Mat4,
    pub color: Color,
    pub intensity: f32,
}

impl VisibleLight {
    /// Directional light whose forward axis points along `forward`
    pub fn directional(forward: Vec3, color: Color, intensity: f32) -> Self {
        let rotation = Quat::from_rotation_arc(Vec3::Z, forward.try_normalize().unwrap_or(Vec3::Z));
        Self {
            local_to_world: Mat4::from_quat(rotation),
            color,
            intensity,
        }
    }

    /// World-space forward axis of the light
    pub fn forward(&self) -> Vec3 {
        self.local_to_world.z_axis.truncate()
    }
}

/// Lights visible this frame and which of them is the main light
#[derive(Clone, Debug, PartialEq)]
pub struct LightData {
    pub visible_lights: Vec<VisibleLight>,
    /// Index into `visible_lights`, negative when there is no main light
    pub main_light_index: i32,
}

impl LightData {
    pub fn new(visible_lights: Vec<VisibleLight>, main_light_index: i32) -> Self {
        Self {
            visible_lights,
            main_light_index,
        }
    }

    /// The main light, if the index points at one
    pub fn main_light(&self) -> Option<&VisibleLight> {
        usize::try_from(self.main_light_index)
            .ok()
            .and_then(|index| self.visible_lights.get(index))
    }
}

impl Default for LightData {
    fn default() -> Self {
        Self::new(Vec::new(), -1)
    }
}

/// The camera's colour and depth targets for this frame
#[derive(Clone, Debug, PartialEq)]
pub struct FrameTargets {
    pub color: TextureDesc,
    pub depth: TextureDesc,
}

impl FrameTargets {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color: TextureDesc::new("_CameraColorAttachment", width, height, TextureFormat::Rgba16Float),
            depth: TextureDesc::new(
                "_CameraDepthAttachment",
                width,
                height,
                TextureFormat::Depth24PlusStencil8,
            ),
        }
    }
}

/// Everything a pass may read while recording
///
/// Populated by the host, read-only for the pipeline.
#[derive(Clone, Debug)]
pub struct FrameData {
    pub frame: u64,
    pub camera: CameraData,
    pub lights: LightData,
    pub cull: CullResults,
    pub targets: FrameTargets,
}

impl FrameData {
    pub fn new(frame: u64, camera: CameraData, targets: FrameTargets) -> Self {
        Self {
            frame,
            camera,
            lights: LightData::default(),
            cull: CullResults::default(),
            targets,
        }
    }

    pub fn with_lights(mut self, lights: LightData) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_visible(mut self, visible: Vec<Renderable>) -> Self {
        self.cull = CullResults::new(visible);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_light_requires_valid_index() {
        let sun = VisibleLight::directional(Vec3::NEG_Y, Color::WHITE, 1.0);
        assert!(LightData::new(vec![sun.clone()], -1).main_light().is_none());
        assert!(LightData::new(vec![sun.clone()], 1).main_light().is_none());
        assert_eq!(LightData::new(vec![sun.clone()], 0).main_light(), Some(&sun));
    }

    #[test]
    fn directional_forward_follows_requested_axis() {
        let light = VisibleLight::directional(Vec3::new(0.0, -2.0, 0.0), Color::WHITE, 1.0);
        assert!(light.forward().abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }
}
