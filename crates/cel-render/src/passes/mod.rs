//! Built-in render passes
//!
//! Each pass is created once by its feature and records into a fresh
//! [`RenderGraph`] every frame.

pub mod bang_shadow;
pub mod hair_shadow;
pub mod rim_light;

pub use bang_shadow::BangShadowPass;
pub use hair_shadow::HairShadowPass;
pub use rim_light::RimLightPass;

use crate::graph::RenderGraph;
use crate::scene::FrameData;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Point in the frame a pass is injected at
///
/// Discriminants follow the host pipeline's ordering; passes sort by them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderPassEvent {
    BeforeRendering = 0,
    BeforeRenderingShadows = 50,
    AfterRenderingShadows = 100,
    BeforeRenderingPrePasses = 150,
    AfterRenderingPrePasses = 200,
    BeforeRenderingGbuffer = 210,
    AfterRenderingGbuffer = 220,
    BeforeRenderingDeferredLights = 230,
    AfterRenderingDeferredLights = 240,
    BeforeRenderingOpaques = 250,
    #[default]
    AfterRenderingOpaques = 300,
    BeforeRenderingSkybox = 350,
    AfterRenderingSkybox = 400,
    BeforeRenderingTransparents = 450,
    AfterRenderingTransparents = 500,
    BeforeRenderingPostProcessing = 550,
    AfterRenderingPostProcessing = 600,
    AfterRendering = 1000,
}

impl RenderPassEvent {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A pass a feature enqueues for the current frame
pub trait ScriptablePass: Send + Sync {
    /// Name of the raster pass this records
    fn name(&self) -> &str;

    fn event(&self) -> RenderPassEvent;

    /// Declare this frame's attachments and draw lists on `graph`
    ///
    /// A pass that cannot draw this frame returns `Ok(())` without adding
    /// anything.
    fn record(&self, graph: &mut RenderGraph, frame: &FrameData) -> Result<()>;
}
