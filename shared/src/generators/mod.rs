//! Procedural generators.
//!
//! Every generator is a pure function of its parameters and an explicit
//! random source, so a fixed seed always rebuilds the same scenery. Output is
//! plain [`MeshData`]; turning it into GPU meshes is the client's job.

pub mod fish_mesh;
pub mod mesh;
pub mod plants;
pub mod rocks;
pub mod sand;

pub use fish_mesh::*;
pub use mesh::*;
pub use plants::*;
pub use rocks::*;
pub use sand::*;

use bevy::math::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::fish::TankBounds;

/// Where a generated object sits on the tank floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    /// Rotation about the vertical axis, in radians
    pub yaw: f32,
}

/// Uniform floor position inside the swim area, `margin` away from the walls.
pub fn scatter_on_floor<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &TankBounds,
    floor_y: f32,
    margin: f32,
) -> Placement {
    let reach = (bounds.half_extent - margin).max(0.0);
    Placement {
        translation: Vec3::new(
            rng.gen_range(-reach..=reach),
            floor_y,
            rng.gen_range(-reach..=reach),
        ),
        yaw: rng.gen_range(0.0..TAU),
    }
}
