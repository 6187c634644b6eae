//! Engine-agnostic triangle mesh data and the primitives the generators are
//! assembled from.
//!
//! ## Conventions
//! - Triangles are counter-clockwise when seen from the side the normal
//!   points to
//! - Thin surfaces (leaves, fins) are single-sided geometry; the client
//!   renders them without back-face culling

use bevy::math::{Affine3A, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Vertex and index buffers for one mesh, ready to be uploaded by the client.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.normalize_or_zero().to_array());
        self.uvs.push(uv);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends `other` after applying `transform` to its vertices.
    ///
    /// Normals go through the inverse transpose so non-uniform scales keep
    /// them perpendicular to the surface.
    pub fn append(&mut self, other: &MeshData, transform: Affine3A) {
        let base = self.positions.len() as u32;
        let normal_matrix = transform.matrix3.inverse().transpose();

        for ((position, normal), uv) in other
            .positions
            .iter()
            .zip(other.normals.iter())
            .zip(other.uvs.iter())
        {
            let position = transform.transform_point3(Vec3::from_array(*position));
            let normal = (normal_matrix * Vec3::from_array(*normal)).normalize_or_zero();
            self.positions.push(position.to_array());
            self.normals.push(normal.to_array());
            self.uvs.push(*uv);
        }
        self.indices
            .extend(other.indices.iter().map(|index| index + base));
    }

    /// Returns a copy of this mesh with `transform` applied.
    pub fn transformed(&self, transform: Affine3A) -> MeshData {
        let mut out = MeshData::new();
        out.append(self, transform);
        out
    }

    /// Largest distance of any vertex from the local origin.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| Vec3::from_array(*p).length())
            .fold(0.0, f32::max)
    }

    /// Largest distance of any vertex from the local Y axis.
    pub fn horizontal_reach(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| Vec2::new(p[0], p[2]).length())
            .fold(0.0, f32::max)
    }

    /// Replaces the normals with area-weighted averages of the face normals.
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }
        self.normals = accumulated
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }
}

/// Sphere centered on the origin.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let mut mesh = MeshData::new();

    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let ring = phi.sin();
        let y = phi.cos();
        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let normal = Vec3::new(ring * theta.cos(), y, ring * theta.sin());
            mesh.push_vertex(
                normal * radius,
                normal,
                [j as f32 / sectors as f32, i as f32 / stacks as f32],
            );
        }
    }

    let row = sectors + 1;
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * row + j;
            let b = a + row;
            mesh.push_triangle(a, a + 1, b);
            mesh.push_triangle(a + 1, b + 1, b);
        }
    }
    mesh
}

/// Open tube standing on the origin and rising along +Y.
pub fn tapered_cylinder(
    bottom_radius: f32,
    top_radius: f32,
    height: f32,
    segments: u32,
) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::new();
    let slope = (bottom_radius - top_radius) / height.max(f32::EPSILON);

    for (level, (radius, y)) in [(bottom_radius, 0.0), (top_radius, height)]
        .into_iter()
        .enumerate()
    {
        for j in 0..=segments {
            let theta = TAU * j as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            mesh.push_vertex(
                Vec3::new(radius * cos, y, radius * sin),
                Vec3::new(cos, slope, sin),
                [j as f32 / segments as f32, level as f32],
            );
        }
    }

    let row = segments + 1;
    for j in 0..segments {
        let bottom = j;
        let top = j + row;
        mesh.push_triangle(top, top + 1, bottom);
        mesh.push_triangle(top + 1, bottom + 1, bottom);
    }
    mesh
}

/// Leaf blade rooted at the origin, growing along +Y and curling toward +Z.
///
/// The width follows a sine profile so the blade is pointed at the tip and
/// narrow at the root. `bend` is the tip's Z offset as a fraction of
/// `length`.
pub fn leaf_blade(width: f32, length: f32, segments: u32, bend: f32) -> MeshData {
    let segments = segments.max(1);
    let mut mesh = MeshData::new();

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let half_width = 0.5 * width * (PI * t).sin().max(0.15 * (1.0 - t));
        let y = length * t;
        let z = bend * length * t * t;
        // Normal of the strip: side axis crossed with the curve tangent
        let normal = Vec3::new(0.0, -2.0 * bend * length * t, length);
        mesh.push_vertex(Vec3::new(-half_width, y, z), normal, [0.0, t]);
        mesh.push_vertex(Vec3::new(half_width, y, z), normal, [1.0, t]);
    }

    for i in 0..segments {
        let left = 2 * i;
        let right = left + 1;
        mesh.push_triangle(left, right, left + 2);
        mesh.push_triangle(right, right + 2, left + 2);
    }
    mesh
}

/// Flat fin in the YZ plane, attached at the origin and trailing along +Z.
///
/// The trailing edge has a notch at `notch` (fraction of `length`) which gives
/// the forked tail look.
pub fn fin(height: f32, length: f32, notch: f32) -> MeshData {
    let mut mesh = MeshData::new();
    let normal = Vec3::X;
    let root = mesh.push_vertex(Vec3::ZERO, normal, [0.0, 0.5]);
    let upper = mesh.push_vertex(Vec3::new(0.0, 0.5 * height, length), normal, [1.0, 1.0]);
    let middle = mesh.push_vertex(Vec3::new(0.0, 0.0, notch * length), normal, [notch, 0.5]);
    let lower = mesh.push_vertex(Vec3::new(0.0, -0.5 * height, length), normal, [1.0, 0.0]);
    mesh.push_triangle(root, upper, middle);
    mesh.push_triangle(root, middle, lower);
    mesh
}
