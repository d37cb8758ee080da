//! Feature trait definition
//!
//! This is the core interface that all rendering features implement.

use super::PassQueue;
use crate::scene::FrameData;
use crate::Result;

/// Feature trait - implemented by all rendering features
///
/// **Lifecycle:**
/// 1. `create()` - Called when the feature becomes active; binds static
///    configuration and builds the feature's passes
/// 2. `add_render_passes()` - Called every frame while active
/// 3. `dispose()` - Called when the feature is disabled or dropped from the
///    registry; a later `create()` starts over from the settings
pub trait Feature: Send + Sync + AsAny {
    /// Unique name for this feature (lowercase snake_case)
    fn name(&self) -> &str;

    /// Validate settings and build the feature's passes
    ///
    /// # Example
    /// ```ignore
    /// fn create(&mut self) -> Result<()> {
    ///     self.pass = Some(MyPass::new(self.settings.event, filter, material));
    ///     Ok(())
    /// }
    /// ```
    fn create(&mut self) -> Result<()>;

    /// Enqueue this frame's passes
    ///
    /// A feature that cannot draw this frame (no material assigned) enqueues
    /// nothing.
    fn add_render_passes<'a>(&'a self, queue: &mut PassQueue<'a>, frame: &FrameData);

    /// Release everything `create()` built
    fn dispose(&mut self) {}
}

/// Helper trait for downcasting feature trait objects
pub trait AsAny {
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

impl<T: Feature + 'static> AsAny for T {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
