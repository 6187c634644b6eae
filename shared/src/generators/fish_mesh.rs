//! Fish bodies.
//!
//! A fish is built facing -Z (its swimming direction). The tail fin is kept
//! as a separate mesh with its own pivot so the client can swing it without
//! touching the body.

use bevy::math::{Affine3A, Quat, Vec3};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use crate::config::FishConfig;

use super::mesh::{fin, uv_sphere, MeshData};

/// Half length of the body relative to the fish size
const BODY_HALF_LENGTH: f32 = 0.5;
const BODY_HALF_HEIGHT: f32 = 0.22;
const BODY_HALF_WIDTH: f32 = 0.14;

/// Radius every part of a fish of `size` stays within, tail included.
pub fn fish_extent(size: f32) -> f32 {
    1.0 * size
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishAppearance {
    pub size: f32,
    pub body_color: Color,
    pub fin_color: Color,
}

/// Random size and palette for one fish.
///
/// The fins share the body hue but are lighter, so each fish reads as a
/// single species.
pub fn random_appearance<R: Rng + ?Sized>(rng: &mut R, config: &FishConfig) -> FishAppearance {
    let hue = rng.gen_range(0.0..360.0);
    let saturation = rng.gen_range(0.55..=0.9);
    let lightness = rng.gen_range(0.4..=0.6);
    FishAppearance {
        size: rng.gen_range(config.min_size..=config.max_size),
        body_color: Color::hsl(hue, saturation, lightness),
        fin_color: Color::hsl(hue, saturation * 0.8, (lightness + 0.2).min(0.9)),
    }
}

/// Meshes of one fish in its local space.
#[derive(Debug, Clone, PartialEq)]
pub struct FishBlueprint {
    pub body: MeshData,
    /// Dorsal and pectoral fins
    pub fins: MeshData,
    pub eyes: MeshData,
    /// Tail fin, relative to `tail_pivot`
    pub tail: MeshData,
    /// Point on the rear of the body the tail swings around
    pub tail_pivot: Vec3,
}

pub fn generate_fish<R: Rng + ?Sized>(rng: &mut R, size: f32) -> FishBlueprint {
    let stretch = rng.gen_range(0.9..=1.1);
    let half_length = BODY_HALF_LENGTH * size * stretch;
    let body = uv_sphere(1.0, 16, 12).transformed(Affine3A::from_scale(Vec3::new(
        BODY_HALF_WIDTH * size,
        BODY_HALF_HEIGHT * size,
        half_length,
    )));

    let mut fins = MeshData::new();
    let dorsal = fin(0.25 * size, 0.3 * size, 0.5);
    // Dorsal fin stands on the back and sweeps toward the tail
    fins.append(
        &dorsal,
        Affine3A::from_rotation_translation(
            Quat::from_rotation_x(-0.6),
            Vec3::new(0.0, 0.85 * BODY_HALF_HEIGHT * size, -0.1 * size),
        ),
    );
    let pectoral = fin(0.1 * size, 0.18 * size, 0.7);
    for side in [-1.0, 1.0] {
        fins.append(
            &pectoral,
            Affine3A::from_rotation_translation(
                Quat::from_rotation_z(side * FRAC_PI_2 * 0.7),
                Vec3::new(
                    side * 0.9 * BODY_HALF_WIDTH * size,
                    -0.3 * BODY_HALF_HEIGHT * size,
                    -0.1 * size,
                ),
            ),
        );
    }

    let mut eyes = MeshData::new();
    let eye = uv_sphere(0.04 * size, 8, 6);
    for side in [-1.0, 1.0] {
        eyes.append(
            &eye,
            Affine3A::from_translation(Vec3::new(0.15 * size * side, 0.08 * size, -0.35 * size)),
        );
    }

    let tail_height = rng.gen_range(0.3..=0.45) * size;
    let tail_length = rng.gen_range(0.25..=0.35) * size;
    let tail = fin(tail_height, tail_length, rng.gen_range(0.4..=0.7));

    FishBlueprint {
        body,
        fins,
        eyes,
        tail,
        tail_pivot: Vec3::new(0.0, 0.0, 0.95 * half_length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_fish_head_points_forward() {
        let mut rng = StdRng::seed_from_u64(4);
        let fish = generate_fish(&mut rng, 1.0);
        assert!(fish.tail_pivot.z > 0.0);
        for eye in &fish.eyes.positions {
            assert!(eye[2] < 0.0);
        }
    }

    #[test]
    fn test_fish_fits_extent() {
        let mut rng = StdRng::seed_from_u64(11);
        for size in [0.6, 1.0, 1.1] {
            let fish = generate_fish(&mut rng, size);
            let attached_tail = fish
                .tail
                .transformed(Affine3A::from_translation(fish.tail_pivot));
            for part in [&fish.body, &fish.fins, &fish.eyes, &attached_tail] {
                assert!(part.bounding_radius() <= fish_extent(size));
            }
        }
    }

    #[test]
    fn test_appearance_within_config() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = FishConfig::default();
        for _ in 0..50 {
            let appearance = random_appearance(&mut rng, &config);
            assert!((config.min_size..=config.max_size).contains(&appearance.size));
            assert_ne!(appearance.body_color, appearance.fin_color);
        }
    }
}
