pub mod inspector;
pub mod panel;

use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiContexts;
use shared::sets::AquariumUpdateSet;
use shared::settings::SceneSettings;

use crate::input::{data::AquariumAction, keyboard::is_action_just_pressed, keyboard::KeyMap};
use crate::scene::{RegenerateScenery, SaveSettings};

pub use inspector::inspector_ui;
pub use panel::settings_panel_system;

/// Which debug windows are open.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub panel_open: bool,
    pub inspector_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            panel_open: true,
            inspector_open: false,
        }
    }
}

/// Set while egui wants the pointer, so camera controls stay idle.
#[derive(Resource, Debug, Default)]
pub struct UiPointerCapture(pub bool);

pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneSettings>()
            .init_resource::<UiState>()
            .init_resource::<UiPointerCapture>()
            .add_systems(
                Update,
                shortcut_system.in_set(AquariumUpdateSet::Input),
            )
            .add_systems(
                Update,
                (settings_panel_system, inspector_ui, update_pointer_capture)
                    .chain()
                    .in_set(AquariumUpdateSet::Ui),
            );
    }
}

pub fn shortcut_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut ui_state: ResMut<UiState>,
    mut regenerate: EventWriter<RegenerateScenery>,
    mut save: EventWriter<SaveSettings>,
) {
    if is_action_just_pressed(AquariumAction::ToggleInspector, &keyboard_input, &key_map) {
        ui_state.inspector_open = !ui_state.inspector_open;
    }
    if is_action_just_pressed(AquariumAction::TogglePanel, &keyboard_input, &key_map) {
        ui_state.panel_open = !ui_state.panel_open;
    }
    if is_action_just_pressed(AquariumAction::RegenerateScenery, &keyboard_input, &key_map) {
        regenerate.write(RegenerateScenery);
    }
    if is_action_just_pressed(AquariumAction::SaveSettings, &keyboard_input, &key_map) {
        save.write(SaveSettings);
    }
}

fn update_pointer_capture(mut contexts: EguiContexts, mut capture: ResMut<UiPointerCapture>) {
    capture.0 = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys_toggle_windows() {
        let mut app = App::new();
        app.add_event::<RegenerateScenery>()
            .add_event::<SaveSettings>()
            .init_resource::<UiState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(KeyMap::default())
            .add_systems(Update, shortcut_system);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::F1);
        app.update();
        assert!(app.world().resource::<UiState>().inspector_open);
        assert!(app.world().resource::<UiState>().panel_open);

        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.clear();
        input.press(KeyCode::F2);
        app.update();
        assert!(!app.world().resource::<UiState>().panel_open);
    }

    #[test]
    fn test_regenerate_key_sends_event() {
        let mut app = App::new();
        app.add_event::<RegenerateScenery>()
            .add_event::<SaveSettings>()
            .init_resource::<UiState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(KeyMap::default())
            .add_systems(Update, shortcut_system);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();
        assert_eq!(app.world().resource::<Events<RegenerateScenery>>().len(), 1);
    }
}
