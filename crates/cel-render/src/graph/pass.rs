//! Raster pass execution context

use super::command::{Command, CommandBuffer};
use super::resource::DrawListHandle;
use crate::draw_list::DrawList;
use crate::{Error, Result};

/// Closure a pass registers to record its draws
///
/// Invoked exactly once, when the graph executes the pass.
pub type RenderFunc = Box<dyn FnOnce(&mut RasterContext<'_>) -> Result<()> + Send>;

/// Context handed to a pass's render function
pub struct RasterContext<'a> {
    pass_name: &'a str,
    cmd: &'a mut CommandBuffer,
    draw_lists: &'a [DrawList],
    declared: &'a [DrawListHandle],
}

impl<'a> RasterContext<'a> {
    pub(crate) fn new(
        pass_name: &'a str,
        cmd: &'a mut CommandBuffer,
        draw_lists: &'a [DrawList],
        declared: &'a [DrawListHandle],
    ) -> Self {
        Self {
            pass_name,
            cmd,
            draw_lists,
            declared,
        }
    }

    pub fn pass_name(&self) -> &str {
        self.pass_name
    }

    /// Record every draw of a list the pass declared with `use_draw_list`
    pub fn draw_renderer_list(&mut self, handle: DrawListHandle) -> Result<()> {
        if !self.declared.contains(&handle) {
            return Err(Error::Graph(format!(
                "Pass '{}' draws {:?} without declaring it",
                self.pass_name, handle
            )));
        }
        let list = self
            .draw_lists
            .get(handle.0)
            .ok_or_else(|| Error::Resource(format!("Unknown draw list {:?}", handle)))?;

        if let Some(ovr) = list.override_material() {
            if let Some(properties) = ovr.properties() {
                self.cmd.push(Command::SetMaterialProperties {
                    material: ovr.material().name().to_string(),
                    properties: properties.clone(),
                });
            }
        }

        for draw in list.commands() {
            self.cmd.push(Command::Draw(draw.clone()));
        }
        Ok(())
    }
}
