//! Rippling water surface material.
//!
//! Extends Bevy's `StandardMaterial` with a small uniform block driving the
//! ripple animation. Only the fragment stage is replaced; the surface mesh is
//! a flat plane and the ripples live in the shading normal.

use bevy::{
    asset::embedded_asset,
    pbr::{ExtendedMaterial, MaterialExtension},
    prelude::*,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use shared::config::WaterConfig;
use shared::sets::AquariumUpdateSet;

use super::RippleUniforms;

const WATER_SHADER_PATH: &str = "embedded://aquarium/shaders/aquarium_water.wgsl";

/// Plugin that registers the water surface material and animates it.
pub struct WaterPlugin;

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "aquarium_water.wgsl");

        app.add_plugins(MaterialPlugin::<WaterSurfaceMaterial>::default())
            .add_systems(
                Update,
                update_water_time.in_set(AquariumUpdateSet::Animation),
            );
    }
}

/// Water surface material type alias for convenience.
pub type WaterSurfaceMaterial = ExtendedMaterial<StandardMaterial, WaterRipple>;

#[derive(Asset, AsBindGroup, TypePath, Debug, Clone, Default)]
pub struct WaterRipple {
    #[uniform(100)]
    pub uniforms: RippleUniforms,
}

impl MaterialExtension for WaterRipple {
    fn fragment_shader() -> ShaderRef {
        WATER_SHADER_PATH.into()
    }
}

/// Marker for the water surface entity.
#[derive(Component)]
pub struct WaterSurface;

/// Opacity of the surface for a water density in `[0, 1]`.
///
/// The surface is always more opaque than the volume below it so it stays
/// visible in clear water.
pub fn surface_alpha(density: f32) -> f32 {
    (0.4 + 0.6 * density.clamp(0.0, 1.0)).min(1.0)
}

pub fn create_water_surface_material(
    config: &WaterConfig,
    color: Color,
    density: f32,
) -> WaterSurfaceMaterial {
    ExtendedMaterial {
        base: StandardMaterial {
            base_color: color.with_alpha(surface_alpha(density)),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.08,
            reflectance: 0.5,
            cull_mode: None, // Visible from below the surface too
            double_sided: true,
            ..default()
        },
        extension: WaterRipple {
            uniforms: RippleUniforms {
                time: 0.0,
                ripple_strength: config.ripple_strength,
                ripple_scale: config.ripple_scale,
                ripple_speed: config.ripple_speed,
            },
        },
    }
}

/// Pushes the elapsed time into every water material.
fn update_water_time(time: Res<Time>, mut materials: ResMut<Assets<WaterSurfaceMaterial>>) {
    let elapsed = time.elapsed_secs();
    for (_, material) in materials.iter_mut() {
        material.extension.uniforms.time = elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_alpha_range() {
        assert_eq!(surface_alpha(0.0), 0.4);
        assert_eq!(surface_alpha(1.0), 1.0);
        assert_eq!(surface_alpha(7.0), 1.0);
        assert!(surface_alpha(0.25) > 0.25);
    }

    #[test]
    fn test_material_copies_ripple_settings() {
        let config = WaterConfig::default();
        let material = create_water_surface_material(&config, config.color, config.density);
        assert_eq!(material.extension.uniforms.ripple_scale, config.ripple_scale);
        assert_eq!(material.extension.uniforms.time, 0.0);
        assert_eq!(material.base.alpha_mode, AlphaMode::Blend);
    }
}
