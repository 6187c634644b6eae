use bevy::math::Vec3;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use super::mesh::MeshData;

/// Spatial frequency of the dunes, per world unit
const DUNE_FREQUENCY: f64 = 0.18;
/// Weight of the finer ripple octave on top of the dunes
const RIPPLE_WEIGHT: f64 = 0.3;

/// Rolling sand heightfield covering `width` x `depth`, centered on the origin.
///
/// `resolution` is the number of quads along each side. Heights stay within
/// `[-dune_height, dune_height]`.
pub fn generate_sand_bed<R: Rng + ?Sized>(
    rng: &mut R,
    width: f32,
    depth: f32,
    resolution: u32,
    dune_height: f32,
) -> MeshData {
    let resolution = resolution.max(1);
    let perlin = Perlin::new(rng.gen());
    let offset = (rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0));
    let mut mesh = MeshData::new();

    for i in 0..=resolution {
        let v = i as f32 / resolution as f32;
        let z = (v - 0.5) * depth;
        for j in 0..=resolution {
            let u = j as f32 / resolution as f32;
            let x = (u - 0.5) * width;

            let sx = x as f64 * DUNE_FREQUENCY + offset.0;
            let sz = z as f64 * DUNE_FREQUENCY + offset.1;
            let dunes = perlin.get([sx, 0.0, sz]);
            let ripples = perlin.get([sx * 4.0, 1.5, sz * 4.0]);
            let sample = ((dunes + RIPPLE_WEIGHT * ripples) / (1.0 + RIPPLE_WEIGHT)) as f32;
            let y = sample.clamp(-1.0, 1.0) * dune_height;

            mesh.push_vertex(Vec3::new(x, y, z), Vec3::Y, [u, v]);
        }
    }

    let row = resolution + 1;
    for i in 0..resolution {
        for j in 0..resolution {
            let a = i * row + j;
            let b = a + row;
            mesh.push_triangle(a, b, a + 1);
            mesh.push_triangle(a + 1, b, b + 1);
        }
    }
    mesh.recompute_normals();
    mesh
}
