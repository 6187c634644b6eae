//! Water shader uniform data
//!
//! Separated into its own module to isolate the `#![allow(dead_code)]` directive,
//! which is required due to the ShaderType derive macro generating internal
//! `check` functions that trigger warnings.

#![allow(dead_code)]

use bevy::render::render_resource::ShaderType;

/// Ripple parameters, matching the WGSL `RippleUniforms` struct.
#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct RippleUniforms {
    /// Seconds since startup, updated every frame
    pub time: f32,
    /// How far the normals are tilted by the ripples
    pub ripple_strength: f32,
    /// Ripples per world unit
    pub ripple_scale: f32,
    pub ripple_speed: f32,
}

impl Default for RippleUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            ripple_strength: 0.35,
            ripple_scale: 0.6,
            ripple_speed: 1.2,
        }
    }
}
