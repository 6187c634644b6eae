//! Applies edits of `SceneSettings` to the running scene.
//!
//! `collect_setting_changes` diffs the live settings against the last applied
//! ones; the apply systems after it each handle one flag of the delta.

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use shared::config::{save_config, AquariumConfig};
use shared::settings::{SceneSettings, SettingsDelta};

use crate::shaders::{surface_alpha, WaterSurfaceMaterial};

use super::setup::{fog_color, fog_density, sun_illuminance, Sun};
use super::{AppliedSettings, ConfigPath, PendingChanges, RegenerateScenery, SaveSettings};
use super::SceneMaterials;

pub fn collect_setting_changes(
    mut settings: ResMut<SceneSettings>,
    mut applied: ResMut<AppliedSettings>,
    mut regenerate: EventReader<RegenerateScenery>,
    mut pending: ResMut<PendingChanges>,
) {
    let clamped = settings.clamped();
    if clamped != *settings {
        *settings = clamped;
    }

    let mut delta = SettingsDelta::between(&applied.0, &settings);
    if regenerate.read().count() > 0 {
        delta = delta.merge(SettingsDelta::regenerate());
    }
    if !delta.is_empty() {
        debug!("Applying scene changes: {:?}", delta);
        applied.0 = settings.clone();
    }
    pending.0 = delta;
}

pub fn apply_water_changes(
    settings: Res<SceneSettings>,
    handles: Res<SceneMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut water_materials: ResMut<Assets<WaterSurfaceMaterial>>,
    mut fogs: Query<&mut DistanceFog>,
) {
    if let Some(volume) = materials.get_mut(&handles.water_volume) {
        volume.base_color = settings
            .water_color
            .with_alpha(settings.water_density.clamp(0.0, 1.0));
    }
    if let Some(surface) = water_materials.get_mut(&handles.water_surface) {
        surface.base.base_color = settings
            .water_color
            .with_alpha(surface_alpha(settings.water_density));
    }
    for mut fog in fogs.iter_mut() {
        fog.color = fog_color(settings.water_color);
        fog.falloff = FogFalloff::Exponential {
            density: fog_density(settings.water_density),
        };
    }
}

pub fn apply_lighting_changes(
    settings: Res<SceneSettings>,
    config: Res<AquariumConfig>,
    mut suns: Query<&mut DirectionalLight, With<Sun>>,
    mut ambient: ResMut<AmbientLight>,
) {
    for mut sun in suns.iter_mut() {
        sun.illuminance = sun_illuminance(settings.light_intensity);
    }
    ambient.brightness = config.lighting.ambient_brightness * settings.light_intensity.max(0.0);
}

/// Writes the live settings into the configuration file.
///
/// Failures are logged and never stop the scene.
pub fn save_settings_system(
    mut events: EventReader<SaveSettings>,
    settings: Res<SceneSettings>,
    mut config: ResMut<AquariumConfig>,
    path: Res<ConfigPath>,
) {
    if events.read().count() == 0 {
        return;
    }
    settings.apply_to_config(&mut config);
    match save_config(&config, &path.0) {
        Ok(()) => info!("Settings saved to {:?}", path.0),
        Err(e) => error!("Failed to save settings: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_app() -> App {
        let mut app = App::new();
        app.add_event::<RegenerateScenery>()
            .init_resource::<PendingChanges>()
            .init_resource::<SceneSettings>()
            .insert_resource(AppliedSettings(SceneSettings::default()))
            .add_systems(Update, collect_setting_changes);
        app
    }

    #[test]
    fn test_untouched_settings_produce_no_changes() {
        let mut app = settings_app();
        app.update();
        assert!(app.world().resource::<PendingChanges>().0.is_empty());
    }

    #[test]
    fn test_edit_is_applied_once() {
        let mut app = settings_app();
        app.world_mut().resource_mut::<SceneSettings>().fish_count = 30;

        app.update();
        assert!(app.world().resource::<PendingChanges>().0.rebuild_school);
        assert_eq!(app.world().resource::<AppliedSettings>().0.fish_count, 30);

        app.update();
        assert!(app.world().resource::<PendingChanges>().0.is_empty());
    }

    #[test]
    fn test_regenerate_event_forces_regeneration() {
        let mut app = settings_app();
        app.world_mut().send_event(RegenerateScenery);
        app.update();
        assert_eq!(
            app.world().resource::<PendingChanges>().0,
            SettingsDelta::regenerate()
        );
    }

    #[test]
    fn test_out_of_range_edits_are_clamped() {
        let mut app = settings_app();
        app.world_mut().resource_mut::<SceneSettings>().plant_variety = 0;
        app.update();
        assert_eq!(app.world().resource::<SceneSettings>().plant_variety, 1);
        // Variety 0 clamps to 1, which differs from the default of 3
        assert!(app.world().resource::<PendingChanges>().0.regenerate_scenery);
    }
}
