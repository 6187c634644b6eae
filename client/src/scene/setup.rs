use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use shared::config::AquariumConfig;
use shared::generators::{generate_sand_bed, PartRole};
use shared::rng::SceneRng;
use shared::settings::SceneSettings;

use crate::camera::OrbitCamera;
use crate::constants::{BASE_ILLUMINANCE, GLASS_THICKNESS, SAND_RESOLUTION};
use crate::shaders::{create_water_surface_material, WaterSurface, WaterSurfaceMaterial};

use super::meshing::build_mesh;
use super::SceneMaterials;

#[derive(Component)]
pub struct Sun;

#[derive(Component)]
pub struct WaterVolume;

#[derive(Component)]
pub struct SandBed;

/// Sand mesh, reused by the caustic overlay.
#[derive(Resource, Debug, Clone)]
pub struct SandMesh(pub Handle<Mesh>);

pub fn sun_illuminance(intensity: f32) -> f32 {
    BASE_ILLUMINANCE * intensity.max(0.0)
}

/// Fog follows the water tint, darkened toward the depths.
pub fn fog_color(water_color: Color) -> Color {
    let srgba = water_color.to_srgba();
    Color::srgb(srgba.red * 0.45, srgba.green * 0.45, srgba.blue * 0.45)
}

/// Exponential fog density for a water density in `[0, 1]`.
pub fn fog_density(water_density: f32) -> f32 {
    0.005 + 0.03 * water_density.clamp(0.0, 1.0)
}

pub fn water_volume_material(color: Color, density: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color.with_alpha(density.clamp(0.0, 1.0)),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.3,
        cull_mode: None,
        double_sided: true,
        ..default()
    }
}

pub fn setup_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut water_materials: ResMut<Assets<WaterSurfaceMaterial>>,
    config: Res<AquariumConfig>,
    settings: Res<SceneSettings>,
    mut rng: ResMut<SceneRng>,
) {
    let tank = &config.tank;

    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        orbit.transform(),
        orbit,
        DistanceFog {
            color: fog_color(settings.water_color),
            falloff: FogFalloff::Exponential {
                density: fog_density(settings.water_density),
            },
            ..default()
        },
    ));

    commands.spawn((
        Sun,
        DirectionalLight {
            illuminance: sun_illuminance(settings.light_intensity),
            shadows_enabled: config.lighting.shadows,
            ..default()
        },
        Transform::from_xyz(4.0, 14.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: config.lighting.ambient_brightness * settings.light_intensity.max(0.0),
        ..default()
    });
    commands.insert_resource(ClearColor(Color::srgb(0.02, 0.03, 0.05)));

    // Glass walls and the dark stand under the tank
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(tank.width, tank.height, tank.depth))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.8, 0.9, 1.0, 0.08),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.05,
            reflectance: 0.6,
            cull_mode: None,
            double_sided: true,
            ..default()
        })),
        Transform::from_xyz(0.0, tank.height / 2.0, 0.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(tank.width + 0.6, 0.4, tank.depth + 0.6))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.08, 0.07, 0.06),
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.35, 0.0),
    ));

    let water_volume = materials.add(water_volume_material(
        settings.water_color,
        settings.water_density,
    ));
    let inner = 2.0 * GLASS_THICKNESS;
    commands.spawn((
        WaterVolume,
        Mesh3d(meshes.add(Cuboid::new(
            tank.width - inner,
            tank.water_level,
            tank.depth - inner,
        ))),
        MeshMaterial3d(water_volume.clone()),
        Transform::from_xyz(0.0, tank.water_level / 2.0, 0.0),
    ));

    let sand = generate_sand_bed(
        &mut rng.0,
        tank.width - inner,
        tank.depth - inner,
        SAND_RESOLUTION,
        config.water.dune_height,
    );
    let sand_mesh = meshes.add(build_mesh(&sand));
    commands.spawn((
        SandBed,
        Mesh3d(sand_mesh.clone()),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: config.water.sand_color,
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::default(),
    ));
    commands.insert_resource(SandMesh(sand_mesh));

    let mut surface_mesh = Plane3d::default()
        .mesh()
        .size(tank.width - inner, tank.depth - inner)
        .subdivisions(16)
        .build();
    if let Err(e) = surface_mesh.generate_tangents() {
        warn!("Water surface has no tangents, normal map disabled: {}", e);
    }
    let water_surface = water_materials.add(create_water_surface_material(
        &config.water,
        settings.water_color,
        settings.water_density,
    ));
    commands.spawn((
        WaterSurface,
        Mesh3d(meshes.add(surface_mesh)),
        MeshMaterial3d(water_surface.clone()),
        Transform::from_xyz(0.0, tank.water_level, 0.0),
    ));

    let leaf = materials.add(StandardMaterial {
        base_color: PartRole::Leaf.tint(settings.plant_color),
        perceptual_roughness: 0.6,
        cull_mode: None,
        double_sided: true,
        ..default()
    });
    let stem = materials.add(StandardMaterial {
        base_color: PartRole::Stem.tint(settings.plant_color),
        perceptual_roughness: 0.7,
        ..default()
    });
    let rock = materials.add(StandardMaterial {
        base_color: config.rocks.color,
        perceptual_roughness: 0.9,
        ..default()
    });
    let fish_eye = materials.add(StandardMaterial {
        base_color: Color::srgb(0.02, 0.02, 0.02),
        perceptual_roughness: 0.1,
        reflectance: 0.8,
        ..default()
    });

    commands.insert_resource(SceneMaterials {
        water_volume,
        water_surface,
        leaf,
        stem,
        rock,
        fish_eye,
    });

    info!(
        "Aquarium tank {}x{}x{} ready, water level {}",
        tank.width, tank.depth, tank.height, tank.water_level
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fog_darker_than_water() {
        let water = Color::srgb(0.2, 0.6, 0.8);
        let fog = fog_color(water).to_srgba();
        assert!(fog.red < 0.2 && fog.green < 0.6 && fog.blue < 0.8);
    }

    #[test]
    fn test_fog_density_grows_with_water_density() {
        assert!(fog_density(1.0) > fog_density(0.0));
        assert_eq!(fog_density(5.0), fog_density(1.0));
    }

    #[test]
    fn test_volume_alpha_is_density() {
        let material = water_volume_material(Color::srgb(0.1, 0.4, 0.6), 0.3);
        assert!((material.base_color.alpha() - 0.3).abs() < 1e-6);
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
        assert_eq!(sun_illuminance(-1.0), 0.0);
    }
}
