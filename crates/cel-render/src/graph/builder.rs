//! Raster pass builder
//!
//! Handed to the setup closure of [`RenderGraph::add_raster_pass`]. Every
//! declaration is validated as it is made so a misdeclared pass fails at
//! record time instead of producing a hazard at execution.

use super::pass::{RasterContext, RenderFunc};
use super::resource::{AccessFlags, DrawListHandle, ResourceData, ResourceHandle, TextureDesc};
use super::{ColorAttachment, DepthAttachment, PassNode, RenderGraph};
use crate::draw_list::DrawListParams;
use crate::{Error, Result};

/// Declares one raster pass's attachments, draw lists and render function
pub struct RasterPassBuilder<'g> {
    graph: &'g mut RenderGraph,
    node: PassNode,
    allow_global_state: bool,
}

impl<'g> RasterPassBuilder<'g> {
    pub(super) fn new(graph: &'g mut RenderGraph, name: &str) -> Self {
        Self {
            graph,
            node: PassNode::new(name),
            allow_global_state: false,
        }
    }

    /// Camera targets of the frame being recorded
    pub fn resource_data(&self) -> ResourceData {
        self.graph.resource_data()
    }

    pub fn texture_desc(&self, texture: ResourceHandle) -> Result<&TextureDesc> {
        self.graph.texture_desc(texture)
    }

    /// Create a transient texture owned by the graph
    pub fn create_texture(&mut self, desc: TextureDesc) -> ResourceHandle {
        self.graph.create_texture(desc)
    }

    /// Bind `texture` as colour attachment `index`
    ///
    /// The access must include `WRITE`, which keeps what earlier passes
    /// left there; add `READ` only when the pass also samples it.
    pub fn set_color_attachment(
        &mut self,
        texture: ResourceHandle,
        index: u32,
        access: AccessFlags,
    ) -> Result<()> {
        let desc = self.graph.texture_desc(texture)?;
        if desc.format.is_depth() {
            return Err(Error::Graph(format!(
                "Pass '{}': '{}' has depth format {:?} and cannot be a colour attachment",
                self.node.name, desc.name, desc.format
            )));
        }
        if !access.contains(AccessFlags::WRITE) {
            return Err(Error::Graph(format!(
                "Pass '{}': colour attachment {} must be written (got {:?})",
                self.node.name, index, access
            )));
        }
        if self.node.color.iter().any(|a| a.index == index) {
            return Err(Error::Graph(format!(
                "Pass '{}': colour attachment {} declared twice",
                self.node.name, index
            )));
        }

        self.node.color.push(ColorAttachment { index, texture, access });
        self.node.track(texture, access);
        Ok(())
    }

    /// Bind `texture` as the depth attachment
    ///
    /// `READ` for depth testing only, `READ_WRITE`/`WRITE` when the pass
    /// writes depth.
    pub fn set_depth_attachment(&mut self, texture: ResourceHandle, access: AccessFlags) -> Result<()> {
        let desc = self.graph.texture_desc(texture)?;
        if !desc.format.is_depth() {
            return Err(Error::Graph(format!(
                "Pass '{}': '{}' is not a depth texture",
                self.node.name, desc.name
            )));
        }
        if !access.intersects(AccessFlags::READ_WRITE) {
            return Err(Error::Graph(format!(
                "Pass '{}': depth attachment needs READ or WRITE access",
                self.node.name
            )));
        }
        if self.node.depth.is_some() {
            return Err(Error::Graph(format!(
                "Pass '{}': depth attachment declared twice",
                self.node.name
            )));
        }

        self.node.depth = Some(DepthAttachment { texture, access });
        self.node.track(texture, access);
        Ok(())
    }

    /// Declare a texture the pass samples or writes outside its attachments
    pub fn use_texture(&mut self, texture: ResourceHandle, access: AccessFlags) -> Result<()> {
        self.graph.texture_desc(texture)?;
        self.node.track(texture, access);
        Ok(())
    }

    /// Build a draw list from the cull result; the pass still has to
    /// declare it with [`use_draw_list`](Self::use_draw_list)
    pub fn create_draw_list(&mut self, params: &DrawListParams) -> DrawListHandle {
        self.graph.create_draw_list(params)
    }

    pub fn use_draw_list(&mut self, handle: DrawListHandle) -> Result<()> {
        if self.graph.draw_list(handle).is_none() {
            return Err(Error::Resource(format!("Unknown draw list {:?}", handle)));
        }
        if !self.node.draw_lists.contains(&handle) {
            self.node.draw_lists.push(handle);
        }
        Ok(())
    }

    pub fn allow_global_state_modification(&mut self, allow: bool) {
        self.allow_global_state = allow;
    }

    /// Publish `texture` under a global name once the pass has executed
    pub fn publish_global_texture(&mut self, texture: ResourceHandle, name: &str) -> Result<()> {
        self.graph.texture_desc(texture)?;
        self.node.publishes.push((name.to_string(), texture));
        Ok(())
    }

    pub fn set_render_func<F>(&mut self, func: F)
    where
        F: FnOnce(&mut RasterContext<'_>) -> Result<()> + Send + 'static,
    {
        let func: RenderFunc = Box::new(func);
        self.node.render_func = Some(func);
    }

    pub(super) fn finish(self) -> Result<PassNode> {
        let node = self.node;
        if node.render_func.is_none() {
            return Err(Error::Graph(format!("Pass '{}' has no render function", node.name)));
        }
        if node.color.is_empty() && node.depth.is_none() {
            return Err(Error::Graph(format!("Pass '{}' declares no attachments", node.name)));
        }
        if !node.publishes.is_empty() && !self.allow_global_state {
            return Err(Error::Graph(format!(
                "Pass '{}' publishes global textures without allowing global state modification",
                node.name
            )));
        }
        Ok(node)
    }
}
