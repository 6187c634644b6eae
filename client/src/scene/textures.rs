//! Optional water textures.
//!
//! Both textures are looked up in the asset folder at startup. When one
//! finishes loading its sampler is switched to repeat addressing and it is
//! wired into the scene; a texture that fails to load is simply never used.

use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use shared::config::AquariumConfig;

use crate::constants::{CAUSTICS_DRIFT, CAUSTICS_TILING};
use crate::shaders::WaterSurfaceMaterial;

use super::{SandMesh, SceneMaterials};

/// Normal map repeats per tank width
const NORMAL_MAP_TILING: f32 = 6.0;
/// Lift of the caustic overlay above the sand, to avoid z-fighting
const CAUSTICS_LIFT: f32 = 0.01;

#[derive(Resource, Debug, Clone)]
pub struct SceneTextures {
    pub water_normals: Handle<Image>,
    pub caustics: Handle<Image>,
}

#[derive(Component)]
pub struct CausticsOverlay;

pub fn load_scene_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<AquariumConfig>,
) {
    let water_normals = asset_server.load_with_settings(
        config.assets.water_normal_map.clone(),
        |settings: &mut ImageLoaderSettings| settings.is_srgb = false,
    );
    let caustics = asset_server.load(config.assets.caustics.clone());
    commands.insert_resource(SceneTextures {
        water_normals,
        caustics,
    });
}

fn repeat_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..ImageSamplerDescriptor::linear()
    })
}

/// UV offset of the caustic pattern at `elapsed` seconds, wrapped to `[0, 1)`.
pub fn caustics_offset(elapsed: f32) -> Vec2 {
    let offset = Vec2::from_array(CAUSTICS_DRIFT) * elapsed;
    offset - offset.floor()
}

pub fn prepare_loaded_textures(
    mut commands: Commands,
    mut events: EventReader<AssetEvent<Image>>,
    textures: Res<SceneTextures>,
    mut images: ResMut<Assets<Image>>,
    handles: Res<SceneMaterials>,
    mut water_materials: ResMut<Assets<WaterSurfaceMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sand: Res<SandMesh>,
) {
    for event in events.read() {
        let AssetEvent::LoadedWithDependencies { id } = event else {
            continue;
        };

        if *id == textures.water_normals.id() {
            if let Some(image) = images.get_mut(*id) {
                image.sampler = repeat_sampler();
            }
            if let Some(material) = water_materials.get_mut(&handles.water_surface) {
                material.base.normal_map_texture = Some(textures.water_normals.clone());
                material.base.uv_transform = Affine2::from_scale(Vec2::splat(NORMAL_MAP_TILING));
            }
            info!("Water normal map attached");
        } else if *id == textures.caustics.id() {
            if let Some(image) = images.get_mut(*id) {
                image.sampler = repeat_sampler();
            }
            commands.spawn((
                CausticsOverlay,
                Mesh3d(sand.0.clone()),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
                    base_color_texture: Some(textures.caustics.clone()),
                    alpha_mode: AlphaMode::Add,
                    unlit: true,
                    uv_transform: Affine2::from_scale(Vec2::splat(CAUSTICS_TILING)),
                    ..default()
                })),
                Transform::from_xyz(0.0, CAUSTICS_LIFT, 0.0),
            ));
            info!("Caustics overlay spawned");
        }
    }
}

pub fn drift_caustics(
    time: Res<Time>,
    overlays: Query<&MeshMaterial3d<StandardMaterial>, With<CausticsOverlay>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let offset = caustics_offset(time.elapsed_secs());
    for material in overlays.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.uv_transform = Affine2::from_scale_angle_translation(
                Vec2::splat(CAUSTICS_TILING),
                0.0,
                offset,
            );
        }
    }
}
