//! Resource management for graph

use crate::material::Color;
use bitflags::bitflags;

/// Pass identifier
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct PassId(pub usize);

/// Texture handle, valid for the graph that issued it
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ResourceHandle(pub u64);

/// Draw list handle, valid for the graph that issued it
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct DrawListHandle(pub usize);

/// Texel format of a graph texture
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba16Float,
    Depth32Float,
    Depth24PlusStencil8,
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float | TextureFormat::Depth24PlusStencil8)
    }
}

/// Description of a texture the graph imports or creates
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Clear value applied the first time a created texture is used
    pub clear: Option<Color>,
}

impl TextureDesc {
    pub fn new(name: impl Into<String>, width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            clear: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_clear(mut self, color: Color) -> Self {
        self.clear = Some(color);
        self
    }
}

bitflags! {
    /// How a pass accesses a texture
    ///
    /// `WRITE` alone keeps the previous contents (they are loaded before the
    /// pass draws); add `DISCARD` when the pass overwrites every texel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const DISCARD = 1 << 2;

        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        const WRITE_ALL = Self::WRITE.bits() | Self::DISCARD.bits();
    }
}

/// Handles of the camera targets imported into a frame graph
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceData {
    pub active_color: ResourceHandle,
    pub active_depth: ResourceHandle,
}
