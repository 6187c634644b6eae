pub mod fish;
pub mod meshing;
pub mod scenery;
pub mod settings;
pub mod setup;
pub mod textures;

use std::path::PathBuf;

use bevy::ecs::schedule::ScheduleConfigs;
use bevy::ecs::system::ScheduleSystem;
use bevy::prelude::*;
use shared::sets::{AquariumFixedUpdateSet, AquariumUpdateSet};
use shared::settings::{SceneSettings, SettingsDelta};

use crate::shaders::{WaterPlugin, WaterSurfaceMaterial};

pub use fish::*;
pub use scenery::*;
pub use settings::*;
pub use setup::*;
pub use textures::*;

/// Materials shared by many entities, kept so they can be edited in place.
#[derive(Resource, Debug, Clone)]
pub struct SceneMaterials {
    pub water_volume: Handle<StandardMaterial>,
    pub water_surface: Handle<WaterSurfaceMaterial>,
    pub leaf: Handle<StandardMaterial>,
    pub stem: Handle<StandardMaterial>,
    pub rock: Handle<StandardMaterial>,
    pub fish_eye: Handle<StandardMaterial>,
}

/// File the "Save settings" action writes to.
#[derive(Resource, Debug, Clone)]
pub struct ConfigPath(pub PathBuf);

/// Settings the scene currently reflects.
#[derive(Resource, Debug, Clone)]
pub struct AppliedSettings(pub SceneSettings);

/// Changes collected this frame, consumed by the apply systems.
#[derive(Resource, Debug, Default)]
pub struct PendingChanges(pub SettingsDelta);

#[derive(Event, Debug, Clone, Copy)]
pub struct RegenerateScenery;

#[derive(Event, Debug, Clone, Copy)]
pub struct SaveSettings;

/// Turns settings edits into scene updates: diff first, then one gated
/// system per kind of change, then saving.
pub fn settings_pipeline() -> ScheduleConfigs<ScheduleSystem> {
    (
        collect_setting_changes,
        apply_water_changes.run_if(|pending: Res<PendingChanges>| pending.0.water),
        apply_lighting_changes.run_if(|pending: Res<PendingChanges>| pending.0.lighting),
        recolor_plants.run_if(|pending: Res<PendingChanges>| pending.0.recolor_plants),
        regenerate_scenery.run_if(|pending: Res<PendingChanges>| pending.0.regenerate_scenery),
        rebuild_school.run_if(|pending: Res<PendingChanges>| pending.0.rebuild_school),
        save_settings_system,
    )
        .chain()
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(WaterPlugin)
            .add_event::<RegenerateScenery>()
            .add_event::<SaveSettings>()
            .init_resource::<PendingChanges>()
            .configure_sets(
                Update,
                (
                    AquariumUpdateSet::Input,
                    AquariumUpdateSet::Settings,
                    AquariumUpdateSet::Animation,
                    AquariumUpdateSet::Rendering,
                    AquariumUpdateSet::Ui,
                )
                    .chain(),
            )
            .configure_sets(
                FixedUpdate,
                (
                    AquariumFixedUpdateSet::Simulation,
                    AquariumFixedUpdateSet::Sync,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (
                    setup_environment,
                    load_scene_textures,
                    spawn_scenery,
                    spawn_school,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    step_school_system.in_set(AquariumFixedUpdateSet::Simulation),
                    sync_fish_transforms.in_set(AquariumFixedUpdateSet::Sync),
                ),
            )
            .add_systems(
                Update,
                settings_pipeline().in_set(AquariumUpdateSet::Settings),
            )
            .add_systems(
                Update,
                (animate_fish_tails, drift_caustics).in_set(AquariumUpdateSet::Animation),
            )
            .add_systems(
                Update,
                prepare_loaded_textures.in_set(AquariumUpdateSet::Rendering),
            );
    }
}

#[cfg(test)]
impl SceneMaterials {
    /// Materials added to `materials`, except the water surface.
    pub(crate) fn for_tests(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            water_volume: materials.add(StandardMaterial::default()),
            water_surface: Handle::default(),
            leaf: materials.add(StandardMaterial::default()),
            stem: materials.add(StandardMaterial::default()),
            rock: materials.add(StandardMaterial::default()),
            fish_eye: materials.add(StandardMaterial::default()),
        }
    }
}
