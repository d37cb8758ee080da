//! Rim light pass - re-draws a layer with an additive rim material

use super::{RenderPassEvent, ScriptablePass};
use crate::draw_list::{DrawListParams, DrawListRequest, MaterialOverride, ShaderTagId};
use crate::filter::{FilterConfig, LayerMask, RenderQueueRange, SortingCriteria};
use crate::graph::{AccessFlags, RenderGraph};
use crate::material::MaterialHandle;
use crate::scene::FrameData;
use crate::Result;

pub const RIM_LIGHT_PASS: &str = "rim_light";

/// Re-draws every renderer on `layer_mask` that provides `shader_tag` with
/// the rim material blended over the camera colour
pub struct RimLightPass {
    event: RenderPassEvent,
    layer_mask: LayerMask,
    shader_tag: ShaderTagId,
    only_opaque: bool,
    material: Option<MaterialHandle>,
}

impl RimLightPass {
    pub fn new(
        event: RenderPassEvent,
        layer_mask: LayerMask,
        shader_tag: ShaderTagId,
        only_opaque: bool,
        material: Option<MaterialHandle>,
    ) -> Self {
        Self {
            event,
            layer_mask,
            shader_tag,
            only_opaque,
            material,
        }
    }

    /// Opaque queues with the camera's opaque sort, or every queue
    /// back-to-front
    pub fn filter_and_sort(&self, frame: &FrameData) -> (FilterConfig, SortingCriteria) {
        if self.only_opaque {
            (
                FilterConfig::new(RenderQueueRange::OPAQUE, self.layer_mask),
                frame.camera.opaque_sort,
            )
        } else {
            (
                FilterConfig::new(RenderQueueRange::ALL, self.layer_mask),
                SortingCriteria::COMMON_TRANSPARENT,
            )
        }
    }

    pub fn has_material(&self) -> bool {
        self.material.is_some()
    }
}

impl ScriptablePass for RimLightPass {
    fn name(&self) -> &str {
        RIM_LIGHT_PASS
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn record(&self, graph: &mut RenderGraph, frame: &FrameData) -> Result<()> {
        let Some(material) = &self.material else {
            log::trace!("Rim light: no material, nothing recorded for frame {}", frame.frame);
            return Ok(());
        };

        let (filter, sort) = self.filter_and_sort(frame);
        let request = DrawListRequest::new(filter, self.shader_tag.clone(), sort)
            .with_override(MaterialOverride::new(material, 0)?);

        graph.add_raster_pass(RIM_LIGHT_PASS, |pass| {
            let targets = pass.resource_data();
            pass.set_color_attachment(targets.active_color, 0, AccessFlags::WRITE)?;
            pass.set_depth_attachment(targets.active_depth, AccessFlags::WRITE)?;

            let list = pass.create_draw_list(&DrawListParams::new(&frame.cull, &frame.camera, request));
            pass.use_draw_list(list)?;
            pass.set_render_func(move |ctx| ctx.draw_renderer_list(list));
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::scene::{FrameTargets, Renderable};
    use crate::CameraData;
    use glam::Vec3;

    fn frame() -> FrameData {
        FrameData::new(1, CameraData::default(), FrameTargets::new(64, 64)).with_visible(vec![
            Renderable::new(0, "Skin", 2000, 1).with_position(Vec3::new(0.0, 0.0, -1.0)),
            Renderable::new(1, "Lashes", 3000, 1).with_position(Vec3::new(0.0, 0.0, -2.0)),
            Renderable::new(2, "Skin", 2000, 1)
                .with_position(Vec3::new(0.0, 0.0, -3.0))
                .with_shader_tags(vec![ShaderTagId::SRP_DEFAULT_UNLIT]),
            Renderable::new(3, "Lashes", 3000, 1).with_position(Vec3::new(0.0, 0.0, -5.0)),
        ])
    }

    fn rim(only_opaque: bool, tag: ShaderTagId) -> RimLightPass {
        RimLightPass::new(
            RenderPassEvent::AfterRenderingOpaques,
            LayerMask::layer(1),
            tag,
            only_opaque,
            Some(Material::new("Rim", vec!["Rim".into()])),
        )
    }

    fn drawn(pass: &RimLightPass, frame: &FrameData) -> Vec<u32> {
        let mut graph = RenderGraph::new(&frame.targets);
        pass.record(&mut graph, frame).unwrap();
        graph.execute().unwrap().draws().map(|d| d.object.0).collect()
    }

    #[test]
    fn only_opaque_skips_transparent_queue() {
        let frame = frame();
        assert_eq!(drawn(&rim(true, ShaderTagId::UNIVERSAL_FORWARD), &frame), vec![0]);
    }

    #[test]
    fn all_queues_sort_back_to_front_within_queue() {
        let frame = frame();
        assert_eq!(drawn(&rim(false, ShaderTagId::UNIVERSAL_FORWARD), &frame), vec![0, 3, 1]);
    }

    #[test]
    fn light_mode_tag_selects_renderers() {
        let frame = frame();
        assert_eq!(drawn(&rim(true, ShaderTagId::SRP_DEFAULT_UNLIT), &frame), vec![2]);
    }

    #[test]
    fn writes_depth_and_preserves_colour() {
        let frame = frame();
        let mut graph = RenderGraph::new(&frame.targets);
        rim(true, ShaderTagId::UNIVERSAL_FORWARD).record(&mut graph, &frame).unwrap();
        let cmd = graph.execute().unwrap();
        match &cmd.commands()[0] {
            crate::graph::Command::BeginRasterPass { color, depth: Some(depth), .. } => {
                assert_eq!(color[0].access, AccessFlags::WRITE);
                assert_eq!(color[0].load, crate::graph::LoadOp::Load);
                assert_eq!(depth.access, AccessFlags::WRITE);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cmd.uniform_writes(), 0);
    }
}
