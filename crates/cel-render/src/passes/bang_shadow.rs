//! Bang shadow pass - renders a solid hair mask over the face depth
//!
//! The face is drawn depth-only first so the hair that follows is clipped by
//! it. The resulting mask is published as a global texture for the face
//! shader to sample.

use super::{RenderPassEvent, ScriptablePass};
use crate::draw_list::{DrawListParams, DrawListRequest, MaterialOverride, ShaderTagId};
use crate::filter::FilterConfig;
use crate::graph::{AccessFlags, RenderGraph};
use crate::material::{Color, MaterialHandle};
use crate::scene::FrameData;
use crate::Result;

pub const BANG_SHADOW_PASS: &str = "bang_shadow";

/// Name of the mask texture the pass renders into
pub const HAIR_SOLID_COLOR_TARGET: &str = "HairSolidColorRT";

/// Global name the mask is published under
pub const HAIR_SOLID_COLOR_GLOBAL: &str = "_HairSolidColor";

const FACE_DEPTH_SUB_PASS: u32 = 0;
const HAIR_SOLID_SUB_PASS: u32 = 1;

pub struct BangShadowPass {
    event: RenderPassEvent,
    face: FilterConfig,
    hair: FilterConfig,
    material: Option<MaterialHandle>,
}

impl BangShadowPass {
    pub fn new(
        event: RenderPassEvent,
        face: FilterConfig,
        hair: FilterConfig,
        material: Option<MaterialHandle>,
    ) -> Self {
        Self {
            event,
            face,
            hair,
            material,
        }
    }

    pub fn has_material(&self) -> bool {
        self.material.is_some()
    }
}

impl ScriptablePass for BangShadowPass {
    fn name(&self) -> &str {
        BANG_SHADOW_PASS
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn record(&self, graph: &mut RenderGraph, frame: &FrameData) -> Result<()> {
        let Some(material) = &self.material else {
            log::trace!("Bang shadow: no material, nothing recorded for frame {}", frame.frame);
            return Ok(());
        };

        let sort = frame.camera.opaque_sort;
        let face_request = DrawListRequest::depth_only(self.face, sort)
            .with_override(MaterialOverride::new(material, FACE_DEPTH_SUB_PASS)?);
        let hair_request = DrawListRequest::new(self.hair, ShaderTagId::UNIVERSAL_FORWARD, sort)
            .with_override(MaterialOverride::new(material, HAIR_SOLID_SUB_PASS)?);

        graph.add_raster_pass(BANG_SHADOW_PASS, |pass| {
            let targets = pass.resource_data();
            let mask_desc = pass
                .texture_desc(targets.active_color)?
                .clone()
                .with_name(HAIR_SOLID_COLOR_TARGET)
                .with_clear(Color::BLACK);
            let mask = pass.create_texture(mask_desc);

            pass.set_color_attachment(mask, 0, AccessFlags::WRITE)?;
            pass.set_depth_attachment(targets.active_depth, AccessFlags::READ_WRITE)?;

            let face = pass.create_draw_list(&DrawListParams::new(&frame.cull, &frame.camera, face_request));
            let hair = pass.create_draw_list(&DrawListParams::new(&frame.cull, &frame.camera, hair_request));
            pass.use_draw_list(face)?;
            pass.use_draw_list(hair)?;

            pass.allow_global_state_modification(true);
            pass.publish_global_texture(mask, HAIR_SOLID_COLOR_GLOBAL)?;

            pass.set_render_func(move |ctx| {
                ctx.draw_renderer_list(face)?;
                ctx.draw_renderer_list(hair)
            });
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{LayerMask, RenderQueueRange};
    use crate::graph::{Command, LoadOp};
    use crate::material::Material;
    use crate::scene::{FrameTargets, Renderable};
    use crate::CameraData;

    const FACE: u8 = 4;
    const HAIR: u8 = 5;

    fn bang(material: Option<MaterialHandle>) -> BangShadowPass {
        let queue = RenderQueueRange::new(2000, 3000);
        BangShadowPass::new(
            RenderPassEvent::BeforeRenderingOpaques,
            FilterConfig::new(queue, LayerMask::layer(FACE)),
            FilterConfig::new(queue, LayerMask::layer(HAIR)),
            material,
        )
    }

    fn frame() -> FrameData {
        FrameData::new(2, CameraData::default(), FrameTargets::new(128, 128)).with_visible(vec![
            Renderable::new(0, "Hair", 2000, HAIR),
            Renderable::new(1, "Face", 2000, FACE),
        ])
    }

    #[test]
    fn face_depth_precedes_hair_colour() {
        let frame = frame();
        let material = Material::new("BangShadow", vec!["FaceDepth".into(), "HairSolid".into()]);
        let mut graph = RenderGraph::new(&frame.targets);
        bang(Some(material)).record(&mut graph, &frame).unwrap();
        let cmd = graph.execute().unwrap();

        let draws: Vec<_> = cmd.draws().map(|d| (d.object.0, d.pass_index, d.depth_only)).collect();
        assert_eq!(draws, vec![(1, Some(0), true), (0, Some(1), false)]);
    }

    #[test]
    fn mask_is_cleared_and_published() {
        let frame = frame();
        let material = Material::new("BangShadow", vec!["FaceDepth".into(), "HairSolid".into()]);
        let mut graph = RenderGraph::new(&frame.targets);
        bang(Some(material)).record(&mut graph, &frame).unwrap();
        graph.compile().unwrap();
        let mask = graph.global_texture(HAIR_SOLID_COLOR_GLOBAL).unwrap();
        assert_eq!(graph.texture_desc(mask).unwrap().name, HAIR_SOLID_COLOR_TARGET);

        let cmd = graph.execute().unwrap();
        match &cmd.commands()[0] {
            Command::BeginRasterPass { color, depth: Some(depth), .. } => {
                assert_eq!(color[0].texture, mask);
                assert_eq!(color[0].load, LoadOp::Clear(Color::BLACK));
                assert_eq!(depth.access, AccessFlags::READ_WRITE);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cmd.global_textures().count(), 1);
    }

    #[test]
    fn single_pass_material_is_rejected() {
        let frame = frame();
        let material = Material::new("Broken", vec!["Only".into()]);
        let mut graph = RenderGraph::new(&frame.targets);
        assert!(bang(Some(material)).record(&mut graph, &frame).is_err());
        assert_eq!(graph.pass_count(), 0);
    }
}
