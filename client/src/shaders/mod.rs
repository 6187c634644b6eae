//! Custom shaders.
//!
//! ## Water surface
//! The ripple shader (`aquarium_water.wgsl`) is embedded in the binary and
//! extends the standard PBR material: it tilts the surface normal with two
//! crossing sine ripples and lets the PBR pipeline do the lighting.

pub mod water;
mod water_uniforms;

pub use water::*;
pub use water_uniforms::RippleUniforms;
