//! Cel Render - render feature pipeline for stylised character passes
//!
//! Features plug a handful of passes into a per-frame render graph:
//!
//! - Passes declare attachments, transient textures and draw lists up front
//! - The graph validates attachment access, orders passes by their resource
//!   hazards and culls passes nobody observes
//! - Draw lists are built from the frame's cull result with queue/layer
//!   filtering, shader-tag matching, sorting and optional material overrides
//! - Executing the graph yields a [`CommandBuffer`] for a host renderer to
//!   replay; nothing here touches a GPU

pub mod config;
pub mod draw_list;
pub mod features;
pub mod filter;
pub mod graph;
pub mod light;
pub mod material;
pub mod passes;
pub mod scene;

mod camera;
mod renderer;

pub use camera::CameraData;
pub use config::{FeatureAsset, FeatureSettings, RendererAsset};
pub use draw_list::{DrawCommand, DrawList, DrawListRequest, MaterialOverride, ShaderTagId};
pub use features::{BangShadowFeature, Feature, FeatureRegistry, HairShadowFeature, RimLightFeature};
pub use filter::{FilterConfig, LayerMask, RenderQueueRange, SortingCriteria};
pub use graph::{AccessFlags, Command, CommandBuffer, LoadOp, RenderGraph, ResourceHandle, TextureDesc};
pub use material::{Color, CompareFunction, Material, MaterialHandle, MaterialLibrary, MaterialParams};
pub use passes::{RenderPassEvent, ScriptablePass};
pub use renderer::{record_frame, FrameStats, Renderer, RendererConfig};
pub use scene::{CullResults, FrameData, LightData, Renderable, VisibleLight};

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or recording a frame
///
/// A feature whose material is unassigned is not an error: its pass simply
/// does not record for that frame.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Feature error: {0}")]
    Feature(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
