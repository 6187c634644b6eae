mod camera;
mod constants;
mod error;
mod input;
mod scene;
mod shaders;
mod ui;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use bevy::{
    log::{Level, LogPlugin},
    prelude::*,
    window::PresentMode,
};
use bevy_inspector_egui::{bevy_egui::EguiPlugin, DefaultInspectorConfigPlugin};
use clap::Parser;
use shared::config::{load_or_create_config, AquariumConfig};
use shared::constants::{DEFAULT_CONFIG_PATH, MAX_FISH};
use shared::rng::SceneRng;
use shared::sets::AquariumUpdateSet;
use shared::settings::SceneSettings;

use camera::orbit_camera_system;
use constants::{DEFAULT_LOG_FILTER, WINDOW_TITLE};
use error::SetupError;
use input::keyboard::get_bindings;
use scene::{AppliedSettings, ConfigPath, ScenePlugin};
use ui::DebugUiPlugin;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        default_value = DEFAULT_CONFIG_PATH,
        help = "Configuration file, created with defaults if missing"
    )]
    config: PathBuf,

    #[arg(short, long, help = "Seed for every random draw, overrides the config")]
    seed: Option<u64>,

    #[arg(short, long, help = "Number of fish, overrides the config")]
    fish_count: Option<u32>,

    #[arg(
        short,
        long,
        help = "Allows overriding of the asset folder path, defaults to the config value"
    )]
    assets: Option<String>,

    #[arg(long, help = "Log filter, e.g. \"aquarium=debug,shared=debug\"")]
    log_filter: Option<String>,
}

/// Reads the configuration file and applies the command line overrides.
fn load_config(args: &Args) -> Result<AquariumConfig, SetupError> {
    let mut config = load_or_create_config(&args.config)?;

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(count) = args.fish_count {
        if count > MAX_FISH {
            return Err(SetupError::Argument {
                flag: "fish-count",
                reason: format!("at most {MAX_FISH} fish are supported, got {count}"),
            });
        }
        config.fish.count = count;
    }
    if let Some(assets) = &args.assets {
        config.assets.root = assets.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), SetupError> {
    let config = load_config(&args)?;
    let settings = SceneSettings::from_config(&config);
    let key_map = get_bindings(args.config.parent().unwrap_or(Path::new(".")));

    println!(
        "Starting aquarium with config {} and assets in {}",
        args.config.display(),
        config.assets.root
    );

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(LogPlugin {
                filter: args
                    .log_filter
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
                level: Level::INFO,
                ..default()
            })
            .set(AssetPlugin {
                file_path: config.assets.root.clone(),
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: WINDOW_TITLE.to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
    );

    app.add_plugins(EguiPlugin {
        enable_multipass_for_primary_context: false,
    })
    .add_plugins(DefaultInspectorConfigPlugin);

    app.insert_resource(Time::<Fixed>::from_hz(config.simulation.steps_per_second))
        .insert_resource(SceneRng::from_seed_option(config.seed))
        .insert_resource(AppliedSettings(settings.clone()))
        .insert_resource(settings)
        .insert_resource(key_map)
        .insert_resource(ConfigPath(args.config))
        .insert_resource(config)
        .add_plugins((ScenePlugin, DebugUiPlugin))
        .add_systems(
            Update,
            orbit_camera_system.in_set(AquariumUpdateSet::Input),
        )
        .run();

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("aquarium: failed to start: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "aquarium-main-{}-{}.ron",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_cli_overrides_config() {
        let path = temp_config("overrides");
        let _ = std::fs::remove_file(&path);
        let args = Args::parse_from([
            "aquarium",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "9",
            "--fish-count",
            "40",
            "--assets",
            "other",
        ]);

        let config = load_config(&args).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.fish.count, 40);
        assert_eq!(config.assets.root, "other");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_too_many_fish_is_rejected() {
        let path = temp_config("too-many");
        let _ = std::fs::remove_file(&path);
        let args = Args::parse_from([
            "aquarium",
            "--config",
            path.to_str().unwrap(),
            "--fish-count",
            "100000",
        ]);

        assert!(matches!(
            load_config(&args),
            Err(SetupError::Argument {
                flag: "fish-count",
                ..
            })
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_config_fails_setup() {
        let path = temp_config("malformed");
        std::fs::write(&path, "(tank: (width: \"wide\"))").unwrap();
        let args = Args::parse_from(["aquarium", "--config", path.to_str().unwrap()]);

        assert!(matches!(load_config(&args), Err(SetupError::Config(_))));

        let _ = std::fs::remove_file(&path);
    }
}
