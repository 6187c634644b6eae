//! Aquarium configuration.
//!
//! Everything that used to be a hard-coded scene constant lives here so that
//! tank size, fish count and lighting can be changed without a rebuild. The
//! file format is RON; missing sections fall back to their defaults.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use bevy_log::{info, warn};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_FISH, MAX_PLANT_DENSITY};
use crate::fish::TankBounds;
use crate::generators::LEAF_PRESETS;

/// Errors raised while reading, writing or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Ron(#[from] ron::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Tank geometry and the volume fish are allowed to target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Inner width of the glass tank (X)
    pub width: f32,
    /// Inner depth of the glass tank (Z)
    pub depth: f32,
    /// Inner height of the glass tank (Y), measured from the floor
    pub height: f32,
    /// Height of the water surface above the floor
    pub water_level: f32,
    /// Fish targets are kept within `[-half_extent, half_extent]` on X and Z
    pub swim_half_extent: f32,
    pub swim_min_y: f32,
    pub swim_max_y: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 20.0,
            height: 8.0,
            water_level: 7.6,
            swim_half_extent: 9.0,
            swim_min_y: 1.0,
            swim_max_y: 7.0,
        }
    }
}

impl TankConfig {
    /// Footprint scenery is scattered on, up to the glass.
    pub fn floor_bounds(&self) -> TankBounds {
        TankBounds {
            half_extent: self.width.min(self.depth) * 0.5,
            min_y: 0.0,
            max_y: self.height,
        }
    }

    pub fn swim_bounds(&self) -> TankBounds {
        TankBounds {
            half_extent: self.swim_half_extent,
            min_y: self.swim_min_y,
            max_y: self.swim_max_y,
        }
    }
}

/// Population and per-fish tuning ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub count: u32,
    /// Cruise speed before the per-fish jitter is applied
    pub base_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub min_tail_speed: f32,
    pub max_tail_speed: f32,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            count: 12,
            base_speed: 1.0,
            min_size: 0.6,
            max_size: 1.1,
            min_tail_speed: 4.0,
            max_tail_speed: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Multiplier on the base count of every plant species
    pub density: f32,
    /// Number of leaf presets in play
    pub variety: u32,
    pub color: Color,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            variety: 3,
            color: Color::srgb(0.22, 0.62, 0.28),
            min_size: 0.7,
            max_size: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockConfig {
    pub count: u32,
    pub min_size: f32,
    pub max_size: f32,
    pub color: Color,
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            count: 6,
            min_size: 0.5,
            max_size: 1.4,
            color: Color::srgb(0.45, 0.43, 0.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub color: Color,
    /// Opacity of the water volume (0 = clear, 1 = opaque)
    pub density: f32,
    pub ripple_strength: f32,
    pub ripple_scale: f32,
    pub ripple_speed: f32,
    pub sand_color: Color,
    pub dune_height: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            color: Color::srgb(0.1, 0.45, 0.65),
            density: 0.25,
            ripple_strength: 0.35,
            ripple_scale: 0.6,
            ripple_speed: 1.2,
            sand_color: Color::srgb(0.76, 0.68, 0.5),
            dune_height: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Multiplier on the sun illuminance
    pub intensity: f32,
    pub ambient_brightness: f32,
    pub shadows: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            ambient_brightness: 250.0,
            shadows: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed steering steps per second
    pub steps_per_second: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_second: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Root folder handed to the asset server
    pub root: String,
    pub water_normal_map: String,
    pub caustics: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: "data".to_string(),
            water_normal_map: "textures/water_normals.png".to_string(),
            caustics: "textures/caustics.png".to_string(),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AquariumConfig {
    /// Fixed seed for every random draw; entropy is used when absent
    pub seed: Option<u64>,
    pub tank: TankConfig,
    pub fish: FishConfig,
    pub plants: PlantConfig,
    pub rocks: RockConfig,
    pub water: WaterConfig,
    pub lighting: LightingConfig,
    pub simulation: SimulationConfig,
    pub assets: AssetConfig,
}

/// Accepted fixed step rates, in steps per second
const STEP_RATE_LIMITS: (f64, f64) = (1.0, 1000.0);

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be positive and finite, got {value}"),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be finite and not negative, got {value}"),
        ));
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::invalid(field, format!("must be finite, got {value}")));
    }
    Ok(())
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
        return Err(ConfigError::invalid(
            field,
            format!("expected 0 < min <= max, got {min}..{max}"),
        ));
    }
    Ok(())
}

impl AquariumConfig {
    /// Rejects values that would break generation or the simulation later on.
    ///
    /// Every float is checked for finiteness first, since NaN slips through
    /// plain comparisons.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tank = &self.tank;
        check_positive("tank.width", tank.width)?;
        check_positive("tank.depth", tank.depth)?;
        check_positive("tank.height", tank.height)?;
        check_positive("tank.water_level", tank.water_level)?;
        check_positive("tank.swim_half_extent", tank.swim_half_extent)?;
        let half_footprint = tank.width.min(tank.depth) * 0.5;
        if tank.swim_half_extent >= half_footprint {
            return Err(ConfigError::invalid(
                "tank.swim_half_extent",
                format!(
                    "must stay inside the glass ({} >= {})",
                    tank.swim_half_extent, half_footprint
                ),
            ));
        }
        check_finite("tank.swim_min_y", tank.swim_min_y)?;
        check_finite("tank.swim_max_y", tank.swim_max_y)?;
        if tank.swim_min_y >= tank.swim_max_y {
            return Err(ConfigError::invalid(
                "tank.swim_min_y",
                format!(
                    "must be below swim_max_y ({} >= {})",
                    tank.swim_min_y, tank.swim_max_y
                ),
            ));
        }
        if tank.swim_max_y > tank.water_level {
            warn!(
                "Fish may target points above the water surface ({} > {})",
                tank.swim_max_y, tank.water_level
            );
        }

        if self.fish.count > MAX_FISH {
            return Err(ConfigError::invalid(
                "fish.count",
                format!("at most {MAX_FISH} fish are supported"),
            ));
        }
        check_positive("fish.base_speed", self.fish.base_speed)?;
        check_range("fish.size", self.fish.min_size, self.fish.max_size)?;
        check_range(
            "fish.tail_speed",
            self.fish.min_tail_speed,
            self.fish.max_tail_speed,
        )?;

        if !(0.0..=MAX_PLANT_DENSITY).contains(&self.plants.density) {
            return Err(ConfigError::invalid(
                "plants.density",
                format!("must lie in [0, {MAX_PLANT_DENSITY}]"),
            ));
        }
        if self.plants.variety == 0 || self.plants.variety as usize > LEAF_PRESETS.len() {
            return Err(ConfigError::invalid(
                "plants.variety",
                format!("must lie in [1, {}]", LEAF_PRESETS.len()),
            ));
        }
        check_range("plants.size", self.plants.min_size, self.plants.max_size)?;
        check_range("rocks.size", self.rocks.min_size, self.rocks.max_size)?;

        if !(0.0..=1.0).contains(&self.water.density) {
            return Err(ConfigError::invalid("water.density", "must lie in [0, 1]"));
        }
        check_non_negative("water.ripple_strength", self.water.ripple_strength)?;
        check_non_negative("water.ripple_scale", self.water.ripple_scale)?;
        check_finite("water.ripple_speed", self.water.ripple_speed)?;
        check_non_negative("water.dune_height", self.water.dune_height)?;

        check_non_negative("lighting.intensity", self.lighting.intensity)?;
        check_non_negative("lighting.ambient_brightness", self.lighting.ambient_brightness)?;

        let steps = self.simulation.steps_per_second;
        let (min_steps, max_steps) = STEP_RATE_LIMITS;
        // NaN fails `contains`, infinity falls outside the range
        if !(min_steps..=max_steps).contains(&steps) {
            return Err(ConfigError::invalid(
                "simulation.steps_per_second",
                format!("must lie in [{min_steps}, {max_steps}], got {steps}"),
            ));
        }
        Ok(())
    }
}

/// Reads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<AquariumConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AquariumConfig = ron::de::from_str(&content)?;
    config.validate()?;
    info!("Loaded aquarium config from {:?}", path);
    Ok(config)
}

/// Loads the configuration at `path`, writing the defaults there first if the
/// file does not exist yet.
pub fn load_or_create_config(path: &Path) -> Result<AquariumConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    let config = AquariumConfig::default();
    save_config(&config, path)?;
    info!("Wrote default aquarium config to {:?}", path);
    Ok(config)
}

pub fn save_config(config: &AquariumConfig, path: &Path) -> Result<(), ConfigError> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(4)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(false);

    let serialized = ron::ser::to_string_pretty(config, pretty_config)?;
    let write = || -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(serialized.as_bytes())
    };
    write().map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "aquarium-config-{}-{}.ron",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AquariumConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_swim_bounds() {
        let bounds = TankConfig::default().swim_bounds();
        assert_eq!(bounds.half_extent, 9.0);
        assert_eq!(bounds.min_y, 1.0);
        assert_eq!(bounds.max_y, 7.0);
    }

    #[test]
    fn test_rejects_inverted_swim_range() {
        let mut config = AquariumConfig::default();
        config.tank.swim_min_y = 7.0;
        config.tank.swim_max_y = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "tank.swim_min_y",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut config = AquariumConfig::default();
        config.tank.swim_half_extent = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "tank.swim_half_extent",
                ..
            })
        ));

        let mut config = AquariumConfig::default();
        config.tank.swim_max_y = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "tank.swim_max_y",
                ..
            })
        ));

        let mut config = AquariumConfig::default();
        config.lighting.intensity = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "lighting.intensity",
                ..
            })
        ));

        for steps in [f64::NAN, f64::INFINITY, 0.0, 0.5] {
            let mut config = AquariumConfig::default();
            config.simulation.steps_per_second = steps;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    field: "simulation.steps_per_second",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_swim_volume_must_fit_in_the_tank() {
        let path = temp_path("wide-swim");
        fs::write(&path, "(tank: (swim_half_extent: 50.0))").unwrap();
        let result = load_config(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "tank.swim_half_extent",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_variety() {
        let mut config = AquariumConfig::default();
        config.plants.variety = 0;
        assert!(config.validate().is_err());
        config.plants.variety = LEAF_PRESETS.len() as u32 + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let path = temp_path("save-load");
        let mut config = AquariumConfig::default();
        config.seed = Some(42);
        config.fish.count = 7;
        config.plants.density = 1.5;

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.fish.count, 7);
        assert_eq!(loaded.plants.density, 1.5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "(fish: (count: 3))").unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.fish.count, 3);
        assert_eq!(loaded.fish.base_speed, FishConfig::default().base_speed);
        assert_eq!(loaded.tank, TankConfig::default());
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let path = temp_path("does-not-exist");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let path = temp_path("create");
        let _ = fs::remove_file(&path);
        let config = load_or_create_config(&path).unwrap();
        assert!(path.exists());
        let _ = fs::remove_file(&path);
        assert_eq!(config, AquariumConfig::default());
    }
}
