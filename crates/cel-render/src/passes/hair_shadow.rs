//! Hair shadow pass - offsets a stencil-masked hair silhouette along the
//! screen-space light direction

use super::{RenderPassEvent, ScriptablePass};
use crate::draw_list::{DrawListParams, DrawListRequest, MaterialOverride, ShaderTagId};
use crate::filter::FilterConfig;
use crate::graph::{AccessFlags, RenderGraph};
use crate::light::resolve_screen_light_direction;
use crate::material::{MaterialBinder, MaterialHandle};
use crate::scene::FrameData;
use crate::Result;

/// Raster pass name
pub const HAIR_SHADOW_PASS: &str = "hair_shadow";

/// Override sub-pass the hair is drawn with
const SHADOW_SUB_PASS: u32 = 0;

/// Draws the hair layer with the shadow material into the camera colour
///
/// Depth is tested, never written. The material's stencil state keeps the
/// shadow on the pixels the face wrote.
pub struct HairShadowPass {
    event: RenderPassEvent,
    filter: FilterConfig,
    binder: MaterialBinder,
    material: Option<MaterialHandle>,
}

impl HairShadowPass {
    pub fn new(
        event: RenderPassEvent,
        filter: FilterConfig,
        binder: MaterialBinder,
        material: Option<MaterialHandle>,
    ) -> Self {
        Self {
            event,
            filter,
            binder,
            material,
        }
    }

    pub fn filter(&self) -> FilterConfig {
        self.filter
    }

    pub fn binder(&self) -> &MaterialBinder {
        &self.binder
    }

    pub fn has_material(&self) -> bool {
        self.material.is_some()
    }
}

impl ScriptablePass for HairShadowPass {
    fn name(&self) -> &str {
        HAIR_SHADOW_PASS
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn record(&self, graph: &mut RenderGraph, frame: &FrameData) -> Result<()> {
        let Some(material) = &self.material else {
            log::trace!("Hair shadow: no material, nothing recorded for frame {}", frame.frame);
            return Ok(());
        };

        let light_dir = resolve_screen_light_direction(&frame.lights, &frame.camera.view);
        let bound = self.binder.bind(material, light_dir);
        let request = DrawListRequest::new(self.filter, ShaderTagId::UNIVERSAL_FORWARD, frame.camera.opaque_sort)
            .with_override(MaterialOverride::bound(&bound, SHADOW_SUB_PASS)?);

        graph.add_raster_pass(HAIR_SHADOW_PASS, |pass| {
            let targets = pass.resource_data();
            pass.set_color_attachment(targets.active_color, 0, AccessFlags::WRITE)?;
            pass.set_depth_attachment(targets.active_depth, AccessFlags::READ)?;

            let list = pass.create_draw_list(&DrawListParams::new(&frame.cull, &frame.camera, request));
            pass.use_draw_list(list)?;
            pass.set_render_func(move |ctx| ctx.draw_renderer_list(list));
            Ok(())
        })?;
        Ok(())
    }
}
