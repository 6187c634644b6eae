use crate::{constants::BINDS_PATH, input::data::AquariumAction};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use ron::{from_str, ser::PrettyConfig};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default = "default_key_map")]
    pub map: BTreeMap<AquariumAction, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            map: default_key_map(),
        }
    }
}

fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> Result<(), std::io::Error> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(binds_path)?;
    file.write_all(serialized.as_bytes())
}

pub fn is_action_just_pressed(
    action: AquariumAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|key_codes| key_codes.iter().any(|key| keyboard_input.just_pressed(*key)))
}

pub(crate) fn default_key_map() -> BTreeMap<AquariumAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(AquariumAction::ToggleInspector, vec![KeyCode::F1]);
    map.insert(AquariumAction::TogglePanel, vec![KeyCode::F2]);
    map.insert(AquariumAction::RegenerateScenery, vec![KeyCode::KeyR]);
    map.insert(AquariumAction::ResetCamera, vec![KeyCode::Home]);
    map.insert(AquariumAction::SaveSettings, vec![KeyCode::F5]);
    map
}

/// Reads the key bindings stored in `folder`, writing the defaults there if
/// the file is missing.
///
/// A malformed file is left untouched and the defaults are used instead.
pub fn get_bindings(folder: &Path) -> KeyMap {
    let binds_path: PathBuf = folder.join(BINDS_PATH);

    match fs::read_to_string(&binds_path) {
        Ok(content) => match from_str::<KeyMap>(&content) {
            Ok(key_map) => return key_map,
            Err(e) => {
                warn!("Ignoring malformed keybindings {:?}: {}", binds_path, e);
                return KeyMap::default();
            }
        },
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            warn!("Failed to read keybindings {:?}: {}", binds_path, e);
            return KeyMap::default();
        }
        Err(_) => {}
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, &binds_path) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_folder(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("aquarium-keys-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_missing_bindings_are_written() {
        let folder = temp_folder("missing");
        let _ = fs::remove_dir_all(&folder);

        let key_map = get_bindings(&folder);
        assert_eq!(key_map, KeyMap::default());
        assert!(folder.join(BINDS_PATH).exists());
        assert_eq!(get_bindings(&folder), key_map);

        let _ = fs::remove_dir_all(&folder);
    }

    #[test]
    fn test_malformed_bindings_fall_back_to_defaults() {
        let folder = temp_folder("malformed");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join(BINDS_PATH), "(map: {").unwrap();

        assert_eq!(get_bindings(&folder), KeyMap::default());
        // The user's file is not overwritten
        assert_eq!(
            fs::read_to_string(folder.join(BINDS_PATH)).unwrap(),
            "(map: {"
        );

        let _ = fs::remove_dir_all(&folder);
    }

    #[test]
    fn test_just_pressed_uses_bound_keys() {
        let key_map = KeyMap::default();
        let mut input = ButtonInput::<KeyCode>::default();
        input.press(KeyCode::F1);

        assert!(is_action_just_pressed(
            AquariumAction::ToggleInspector,
            &input,
            &key_map
        ));
        assert!(!is_action_just_pressed(
            AquariumAction::TogglePanel,
            &input,
            &key_map
        ));
    }
}
