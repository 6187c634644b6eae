//! Procedural rocks: a squashed sphere displaced by Perlin noise, with a few
//! pebbles resting against its base.

use bevy::math::{Affine3A, Quat, Vec3};
use noise::{NoiseFn, Perlin};
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::RockConfig;
use crate::fish::TankBounds;

use super::mesh::{uv_sphere, MeshData};
use super::{scatter_on_floor, Placement};

/// Largest relative displacement applied by the noise
const ROCK_ROUGHNESS: f32 = 0.25;
/// Spatial frequency of the surface noise on the unit sphere
const ROCK_NOISE_FREQUENCY: f64 = 1.7;

/// Every vertex of a rock of `size` stays within this radius of its origin.
pub fn rock_extent(size: f32) -> f32 {
    1.6 * size
}

/// Generates a single rock centered on the origin and resting on y = 0.
pub fn generate_rock<R: Rng + ?Sized>(rng: &mut R, size: f32) -> MeshData {
    let perlin = Perlin::new(rng.gen());
    let offset = [
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
    ];
    let squash = Vec3::new(
        rng.gen_range(0.9..=1.2),
        rng.gen_range(0.5..=0.85),
        rng.gen_range(0.9..=1.2),
    );

    let mut rock = uv_sphere(1.0, 20, 14);
    for position in rock.positions.iter_mut() {
        let unit = Vec3::from_array(*position);
        let sample = perlin.get([
            unit.x as f64 * ROCK_NOISE_FREQUENCY + offset[0],
            unit.y as f64 * ROCK_NOISE_FREQUENCY + offset[1],
            unit.z as f64 * ROCK_NOISE_FREQUENCY + offset[2],
        ]) as f32;
        let displaced = unit * (1.0 + ROCK_ROUGHNESS * sample.clamp(-1.0, 1.0));
        *position = (displaced * squash * size).to_array();
    }

    // Raise by a quarter so only the bottom of the rock is buried in the sand
    let sink = Affine3A::from_translation(Vec3::new(0.0, 0.25 * squash.y * size, 0.0));
    let mut mesh = MeshData::new();
    rock.recompute_normals();
    mesh.append(&rock, sink);

    let pebble = uv_sphere(1.0, 8, 6);
    for _ in 0..rng.gen_range(2..=4) {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(0.8..=1.1) * size;
        let radius = rng.gen_range(0.12..=0.22) * size;
        let center = Vec3::new(angle.cos() * distance, 0.5 * radius, angle.sin() * distance);
        mesh.append(
            &pebble,
            Affine3A::from_scale_rotation_translation(
                Vec3::new(radius, radius * 0.7, radius),
                Quat::from_rotation_y(angle),
                center,
            ),
        );
    }
    mesh
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRock {
    pub placement: Placement,
    pub size: f32,
    pub mesh: MeshData,
}

/// Generates and scatters the configured number of rocks.
pub fn generate_rock_field<R: Rng + ?Sized>(
    rng: &mut R,
    config: &RockConfig,
    bounds: &TankBounds,
    floor_y: f32,
) -> Vec<PlacedRock> {
    (0..config.count)
        .map(|_| {
            let size = rng.gen_range(config.min_size..=config.max_size);
            let mesh = generate_rock(rng, size);
            PlacedRock {
                placement: scatter_on_floor(rng, bounds, floor_y, rock_extent(size)),
                size,
                mesh,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_rocks_stay_within_extent() {
        let mut rng = StdRng::seed_from_u64(31);
        for size in [0.3, 1.0, 2.0] {
            for _ in 0..25 {
                let rock = generate_rock(&mut rng, size);
                assert!(rock.bounding_radius() <= rock_extent(size));
            }
        }
    }

    #[test]
    fn test_rock_rests_on_floor() {
        let mut rng = StdRng::seed_from_u64(12);
        let rock = generate_rock(&mut rng, 1.0);
        let lowest = rock
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::MAX, f32::min);
        // Partly sunk into the sand, never hovering above it
        assert!(lowest < 0.0);
    }

    #[test]
    fn test_rock_field_count_and_seed() {
        let config = RockConfig::default();
        let bounds = TankBounds::default();
        let a = generate_rock_field(&mut StdRng::seed_from_u64(3), &config, &bounds, 0.0);
        let b = generate_rock_field(&mut StdRng::seed_from_u64(3), &config, &bounds, 0.0);
        assert_eq!(a.len(), config.count as usize);
        assert_eq!(a, b);
    }
}
