//! Screen-space light direction for the main light

use crate::scene::LightData;
use glam::{Mat4, Vec2};

/// Direction used when there is no main light: straight down the screen
pub const DEFAULT_SCREEN_LIGHT_DIR: Vec2 = Vec2::NEG_Y;

/// Squared length at or below which the direction is left unnormalised
///
/// A light pointing almost along the view axis projects to a near-zero
/// vector; normalising it would amplify noise or produce NaN.
pub const MIN_NORMALIZE_LENGTH_SQ: f32 = 1e-4;

/// Project the main light's direction into view space and keep X/Y
///
/// The direction is the light's forward axis negated, i.e. pointing from the
/// lit surface back towards the light.
pub fn resolve_screen_light_direction(lights: &LightData, world_to_view: &Mat4) -> Vec2 {
    let Some(main_light) = lights.main_light() else {
        return DEFAULT_SCREEN_LIGHT_DIR;
    };

    let dir_ws = -main_light.forward();
    let dir_vs = world_to_view.transform_vector3(dir_ws);
    let dir_ss = dir_vs.truncate();

    if dir_ss.length_squared() > MIN_NORMALIZE_LENGTH_SQ {
        dir_ss.normalize()
    } else {
        dir_ss
    }
}
