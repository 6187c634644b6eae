//! Runtime-tweakable scene parameters and the diff that decides which parts
//! of the scene must be rebuilt after an edit.

use bevy::prelude::*;

use crate::config::AquariumConfig;
use crate::constants::{MAX_FISH, MAX_PLANT_DENSITY};
use crate::generators::{PlantBedSettings, LEAF_PRESETS};

/// Values edited live from the debug panel and the inspector.
#[derive(Resource, Reflect, Debug, Clone, PartialEq)]
#[reflect(Resource)]
pub struct SceneSettings {
    pub water_color: Color,
    /// Opacity of the water volume
    pub water_density: f32,
    pub plant_density: f32,
    /// Number of leaf presets in play
    pub plant_variety: u32,
    pub plant_color: Color,
    pub light_intensity: f32,
    pub fish_count: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from_config(&AquariumConfig::default())
    }
}

impl SceneSettings {
    pub fn from_config(config: &AquariumConfig) -> Self {
        Self {
            water_color: config.water.color,
            water_density: config.water.density,
            plant_density: config.plants.density,
            plant_variety: config.plants.variety,
            plant_color: config.plants.color,
            light_intensity: config.lighting.intensity,
            fish_count: config.fish.count,
        }
    }

    /// Writes the live values back into `config`, so they can be saved.
    pub fn apply_to_config(&self, config: &mut AquariumConfig) {
        config.water.color = self.water_color;
        config.water.density = self.water_density;
        config.plants.density = self.plant_density;
        config.plants.variety = self.plant_variety;
        config.plants.color = self.plant_color;
        config.lighting.intensity = self.light_intensity;
        config.fish.count = self.fish_count;
    }

    /// Copy with every value pulled back into its supported range.
    ///
    /// The inspector edits fields without any bounds, so live values are
    /// clamped before they reach the generators.
    pub fn clamped(&self) -> Self {
        Self {
            water_color: self.water_color,
            water_density: self.water_density.clamp(0.0, 1.0),
            plant_density: self.plant_density.clamp(0.0, MAX_PLANT_DENSITY),
            plant_variety: self.plant_variety.clamp(1, LEAF_PRESETS.len() as u32),
            plant_color: self.plant_color,
            light_intensity: self.light_intensity.max(0.0),
            fish_count: self.fish_count.min(MAX_FISH),
        }
    }

    pub fn plant_bed(&self, config: &AquariumConfig) -> PlantBedSettings {
        PlantBedSettings {
            density: self.plant_density,
            variety: self.plant_variety,
            min_size: config.plants.min_size,
            max_size: config.plants.max_size,
        }
    }
}

/// What has to be refreshed to go from one set of settings to another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsDelta {
    /// Water material and fog
    pub water: bool,
    pub lighting: bool,
    /// Only plant materials change; meshes are kept
    pub recolor_plants: bool,
    /// Plants and rocks are thrown away and generated again
    pub regenerate_scenery: bool,
    /// The fish school is resized and fish renderables respawned
    pub rebuild_school: bool,
}

impl SettingsDelta {
    pub fn between(old: &SceneSettings, new: &SceneSettings) -> Self {
        let regenerate_scenery =
            old.plant_density != new.plant_density || old.plant_variety != new.plant_variety;
        Self {
            water: old.water_color != new.water_color || old.water_density != new.water_density,
            lighting: old.light_intensity != new.light_intensity,
            // A regeneration already builds plants with the new color
            recolor_plants: !regenerate_scenery && old.plant_color != new.plant_color,
            regenerate_scenery,
            rebuild_school: old.fish_count != new.fish_count,
        }
    }

    /// Delta that rebuilds the scenery regardless of the settings.
    pub fn regenerate() -> Self {
        Self {
            regenerate_scenery: true,
            ..default()
        }
    }

    /// Union of two deltas, keeping regeneration ahead of a recolor.
    pub fn merge(self, other: Self) -> Self {
        let regenerate_scenery = self.regenerate_scenery || other.regenerate_scenery;
        Self {
            water: self.water || other.water,
            lighting: self.lighting || other.lighting,
            recolor_plants: !regenerate_scenery && (self.recolor_plants || other.recolor_plants),
            regenerate_scenery,
            rebuild_school: self.rebuild_school || other.rebuild_school,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
