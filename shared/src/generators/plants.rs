//! Procedural aquarium plants.
//!
//! Three species share the plant bed:
//! - primary plants: a rosette of leaves grown from one of the
//!   [`LEAF_PRESETS`], on a short crown stem
//! - secondary plants: a tall stem carrying pairs of small leaflets, only
//!   present once at least two presets are in play
//! - moss: low mounds of small blobs
//!
//! Each species is counted independently from the density multiplier.

use bevy::math::{Affine3A, Quat, Vec3};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::constants::{
    MOSS_BASE_COUNT, PRIMARY_PLANT_BASE_COUNT, SECONDARY_PLANT_BASE_COUNT,
    SECONDARY_PLANT_MIN_VARIETY, STEM_SHADE,
};
use crate::fish::TankBounds;

use super::mesh::{leaf_blade, tapered_cylinder, uv_sphere, MeshData};
use super::{scatter_on_floor, Placement};

/// Leaf shape and growth parameters for primary plants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafPreset {
    pub name: &'static str,
    pub min_leaves: u32,
    pub max_leaves: u32,
    /// Blade width relative to the plant size
    pub width: f32,
    pub min_length: f32,
    pub max_length: f32,
    /// Tip offset as a fraction of the blade length
    pub max_bend: f32,
    /// Largest outward tilt of a leaf from vertical, in radians
    pub max_tilt: f32,
}

pub const LEAF_PRESETS: [LeafPreset; 4] = [
    LeafPreset {
        name: "ribbon",
        min_leaves: 5,
        max_leaves: 9,
        width: 0.12,
        min_length: 2.5,
        max_length: 4.0,
        max_bend: 0.4,
        max_tilt: 0.25,
    },
    LeafPreset {
        name: "sword",
        min_leaves: 6,
        max_leaves: 10,
        width: 0.35,
        min_length: 1.4,
        max_length: 2.4,
        max_bend: 0.3,
        max_tilt: 0.7,
    },
    LeafPreset {
        name: "fern",
        min_leaves: 8,
        max_leaves: 14,
        width: 0.22,
        min_length: 0.9,
        max_length: 1.6,
        max_bend: 0.5,
        max_tilt: 1.0,
    },
    LeafPreset {
        name: "bushy",
        min_leaves: 12,
        max_leaves: 20,
        width: 0.28,
        min_length: 0.5,
        max_length: 0.9,
        max_bend: 0.2,
        max_tilt: 1.2,
    },
];

/// What a plant part represents, which decides how it is tinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartRole {
    Stem,
    Leaf,
    Moss,
}

impl PartRole {
    /// Color of this part for the chosen plant color.
    ///
    /// Stems keep [`STEM_SHADE`] of the color's sRGB intensity so they stay
    /// darker than the leaves after a recolor.
    pub fn tint(self, base: Color) -> Color {
        match self {
            PartRole::Stem => {
                let srgba = base.to_srgba();
                Color::srgba(
                    srgba.red * STEM_SHADE,
                    srgba.green * STEM_SHADE,
                    srgba.blue * STEM_SHADE,
                    srgba.alpha,
                )
            }
            PartRole::Leaf | PartRole::Moss => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlantKind {
    Primary,
    Secondary,
    Moss,
}

impl PlantKind {
    /// Radius every part of a plant of this kind stays within.
    pub fn max_extent(self, size: f32) -> f32 {
        match self {
            PlantKind::Primary => 5.0 * size,
            PlantKind::Secondary => 3.5 * size,
            PlantKind::Moss => 1.0 * size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantPart {
    pub role: PartRole,
    pub mesh: MeshData,
}

/// A generated plant in its own local space, rooted at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantBlueprint {
    pub kind: PlantKind,
    /// Index into [`LEAF_PRESETS`] for primary plants
    pub preset: Option<usize>,
    pub parts: Vec<PlantPart>,
}

impl PlantBlueprint {
    pub fn bounding_radius(&self) -> f32 {
        self.parts
            .iter()
            .map(|part| part.mesh.bounding_radius())
            .fold(0.0, f32::max)
    }

    /// Distance the plant spreads sideways from its root, at any yaw.
    pub fn horizontal_reach(&self) -> f32 {
        self.parts
            .iter()
            .map(|part| part.mesh.horizontal_reach())
            .fold(0.0, f32::max)
    }

    pub fn parts_with_role(&self, role: PartRole) -> impl Iterator<Item = &PlantPart> {
        self.parts.iter().filter(move |part| part.role == role)
    }
}

/// Number of plants of each species for a density and variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlantCounts {
    pub primary: u32,
    pub secondary: u32,
    pub moss: u32,
}

impl PlantCounts {
    pub fn total(&self) -> u32 {
        self.primary + self.secondary + self.moss
    }
}

pub fn plant_counts(density: f32, variety: u32) -> PlantCounts {
    let scaled = |base: u32| (base as f32 * density.max(0.0)).floor() as u32;
    PlantCounts {
        primary: scaled(PRIMARY_PLANT_BASE_COUNT),
        secondary: if variety >= SECONDARY_PLANT_MIN_VARIETY {
            scaled(SECONDARY_PLANT_BASE_COUNT)
        } else {
            0
        },
        moss: scaled(MOSS_BASE_COUNT),
    }
}

/// Rosette of blades around a short crown stem.
pub fn generate_primary_plant<R: Rng + ?Sized>(
    rng: &mut R,
    preset_index: usize,
    size: f32,
) -> PlantBlueprint {
    let preset = &LEAF_PRESETS[preset_index.min(LEAF_PRESETS.len() - 1)];
    let mut leaves = MeshData::new();
    let leaf_count = rng.gen_range(preset.min_leaves..=preset.max_leaves);

    for i in 0..leaf_count {
        let length = rng.gen_range(preset.min_length..=preset.max_length) * size;
        let bend = rng.gen_range(0.0..=preset.max_bend);
        let blade = leaf_blade(preset.width * size, length, 6, bend);

        let yaw = TAU * i as f32 / leaf_count as f32 + rng.gen_range(-0.3..=0.3);
        let tilt = rng.gen_range(0.0..=preset.max_tilt);
        let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(tilt);
        leaves.append(&blade, Affine3A::from_quat(rotation));
    }

    let crown = tapered_cylinder(0.12 * size, 0.06 * size, 0.2 * size, 6);

    PlantBlueprint {
        kind: PlantKind::Primary,
        preset: Some(preset_index),
        parts: vec![
            PlantPart {
                role: PartRole::Stem,
                mesh: crown,
            },
            PlantPart {
                role: PartRole::Leaf,
                mesh: leaves,
            },
        ],
    }
}

/// Upright stem with leaflet pairs along its upper part.
pub fn generate_secondary_plant<R: Rng + ?Sized>(rng: &mut R, size: f32) -> PlantBlueprint {
    let height = rng.gen_range(1.5..=2.5) * size;
    let stem = tapered_cylinder(0.05 * size, 0.025 * size, height, 6);

    let mut leaves = MeshData::new();
    let pairs = rng.gen_range(3..=6);
    for pair in 0..pairs {
        let t = 0.3 + 0.7 * (pair as f32 + 0.5) / pairs as f32;
        let node = Vec3::new(0.0, height * t, 0.0);
        let base_yaw = pair as f32 * 1.3 + rng.gen_range(-0.2..=0.2);
        for side in [0.0, std::f32::consts::PI] {
            let length = rng.gen_range(0.35..=0.6) * size;
            let blade = leaf_blade(0.16 * size, length, 4, 0.25);
            let rotation = Quat::from_rotation_y(base_yaw + side)
                * Quat::from_rotation_x(FRAC_PI_2 - rng.gen_range(0.2..=0.6));
            leaves.append(
                &blade,
                Affine3A::from_rotation_translation(rotation, node),
            );
        }
    }

    PlantBlueprint {
        kind: PlantKind::Secondary,
        preset: None,
        parts: vec![
            PlantPart {
                role: PartRole::Stem,
                mesh: stem,
            },
            PlantPart {
                role: PartRole::Leaf,
                mesh: leaves,
            },
        ],
    }
}

/// Flattened cluster of blobs hugging the floor.
pub fn generate_moss<R: Rng + ?Sized>(rng: &mut R, size: f32) -> PlantBlueprint {
    let mut mound = MeshData::new();
    let blob = uv_sphere(1.0, 8, 6);
    let blobs = rng.gen_range(6..=12);

    for _ in 0..blobs {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(0.0..=0.5) * size;
        let radius = rng.gen_range(0.1..=0.2) * size;
        let center = Vec3::new(angle.cos() * distance, 0.05 * size, angle.sin() * distance);
        let scale = Vec3::new(radius, radius * 0.6, radius);
        mound.append(
            &blob,
            Affine3A::from_scale_rotation_translation(scale, Quat::IDENTITY, center),
        );
    }

    PlantBlueprint {
        kind: PlantKind::Moss,
        preset: None,
        parts: vec![PlantPart {
            role: PartRole::Moss,
            mesh: mound,
        }],
    }
}

/// Generates one plant of `kind`. Primary plants draw their preset among the
/// first `variety` presets.
pub fn generate_plant<R: Rng + ?Sized>(
    rng: &mut R,
    kind: PlantKind,
    variety: u32,
    size: f32,
) -> PlantBlueprint {
    match kind {
        PlantKind::Primary => {
            let presets = (variety as usize).clamp(1, LEAF_PRESETS.len());
            let preset = rng.gen_range(0..presets);
            generate_primary_plant(rng, preset, size)
        }
        PlantKind::Secondary => generate_secondary_plant(rng, size),
        PlantKind::Moss => generate_moss(rng, size),
    }
}

/// Inputs of a full plant bed regeneration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantBedSettings {
    pub density: f32,
    pub variety: u32,
    pub min_size: f32,
    pub max_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPlant {
    pub placement: Placement,
    pub blueprint: PlantBlueprint,
}

/// Generates and scatters every plant of the bed on the tank floor.
///
/// Each plant is kept far enough from the edges of `bounds` that no leaf
/// crosses them, whatever its yaw.
pub fn generate_plant_bed<R: Rng + ?Sized>(
    rng: &mut R,
    settings: &PlantBedSettings,
    bounds: &TankBounds,
    floor_y: f32,
) -> Vec<PlacedPlant> {
    let counts = plant_counts(settings.density, settings.variety);
    let kinds = std::iter::repeat(PlantKind::Primary)
        .take(counts.primary as usize)
        .chain(std::iter::repeat(PlantKind::Secondary).take(counts.secondary as usize))
        .chain(std::iter::repeat(PlantKind::Moss).take(counts.moss as usize));

    kinds
        .map(|kind| {
            let size = rng.gen_range(settings.min_size..=settings.max_size);
            let blueprint = generate_plant(rng, kind, settings.variety, size);
            let margin = blueprint.horizontal_reach();
            PlacedPlant {
                placement: scatter_on_floor(rng, bounds, floor_y, margin),
                blueprint,
            }
        })
        .collect()
}
