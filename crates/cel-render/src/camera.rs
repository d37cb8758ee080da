//! Camera utilities

use crate::filter::SortingCriteria;
use glam::{Mat4, Vec3};

/// Per-frame camera data supplied by the host
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraData {
    /// World-to-view transform
    pub view: Mat4,
    /// View-to-clip transform
    pub projection: Mat4,
    /// Camera position in world space
    pub position: Vec3,
    /// Sort flags opaque draw lists should use with this camera
    pub opaque_sort: SortingCriteria,
}

impl CameraData {
    pub fn new(view: Mat4, projection: Mat4, position: Vec3) -> Self {
        Self {
            view,
            projection,
            position,
            opaque_sort: SortingCriteria::COMMON_OPAQUE,
        }
    }

    /// Create a perspective camera
    pub fn perspective(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(position, target, up);
        let projection = Mat4::perspective_rh(fov_y, aspect, near, far);
        Self::new(view, projection, position)
    }
}

impl Default for CameraData {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO)
    }
}
