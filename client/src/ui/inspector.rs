use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_inspector_egui::bevy_egui::EguiContext;
use bevy_inspector_egui::bevy_inspector;
use shared::settings::SceneSettings;

use super::UiState;

/// Reflection inspector for the scene settings, toggled with F1.
pub fn inspector_ui(world: &mut World) {
    let open = world
        .get_resource::<UiState>()
        .is_some_and(|state| state.inspector_open);
    if !open {
        return;
    }

    let Ok(egui_context) = world
        .query_filtered::<&mut EguiContext, With<PrimaryWindow>>()
        .single(world)
    else {
        return;
    };
    let mut egui_context = egui_context.clone();

    egui::Window::new("Inspector")
        .default_size([300.0, 260.0])
        .show(egui_context.get_mut(), |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Scene settings");
                bevy_inspector::ui_for_resource::<SceneSettings>(world, ui);
            });
        });
}
