//! Recorded output of an executed graph

use super::resource::{AccessFlags, ResourceHandle};
use crate::draw_list::DrawCommand;
use crate::material::{Color, PropertyBlock};
use std::sync::Arc;

/// What happens to an attachment's contents when a pass begins
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOp {
    Load,
    Clear(Color),
    DontCare,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorTarget {
    pub index: u32,
    pub texture: ResourceHandle,
    pub access: AccessFlags,
    pub load: LoadOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepthTarget {
    pub texture: ResourceHandle,
    pub access: AccessFlags,
    pub load: LoadOp,
}

/// A single recorded command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginRasterPass {
        name: String,
        color: Vec<ColorTarget>,
        depth: Option<DepthTarget>,
    },
    /// Uniform values for the override material of the draws that follow
    SetMaterialProperties {
        material: String,
        properties: Arc<PropertyBlock>,
    },
    Draw(DrawCommand),
    SetGlobalTexture {
        name: String,
        texture: ResourceHandle,
    },
    EndRasterPass,
}

/// Ordered commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All draws in submission order
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(draw) => Some(draw),
            _ => None,
        })
    }

    /// Names of the raster passes in execution order
    pub fn pass_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::BeginRasterPass { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of individual shader property values written
    pub fn uniform_writes(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                Command::SetMaterialProperties { properties, .. } => properties.len(),
                _ => 0,
            })
            .sum()
    }

    /// Textures published under a global name
    pub fn global_textures(&self) -> impl Iterator<Item = (&str, ResourceHandle)> {
        self.commands.iter().filter_map(|c| match c {
            Command::SetGlobalTexture { name, texture } => Some((name.as_str(), *texture)),
            _ => None,
        })
    }
}
