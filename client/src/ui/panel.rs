use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiContexts;
use egui::color_picker::color_edit_button_rgb;
use shared::constants::{MAX_FISH, MAX_PLANT_DENSITY};
use shared::generators::LEAF_PRESETS;
use shared::settings::SceneSettings;

use crate::scene::{RegenerateScenery, SaveSettings};

use super::UiState;

fn to_rgb(color: Color) -> [f32; 3] {
    let srgba = color.to_srgba();
    [srgba.red, srgba.green, srgba.blue]
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = to_rgb(*color);
        if color_edit_button_rgb(ui, &mut rgb).changed() {
            *color = Color::srgb(rgb[0], rgb[1], rgb[2]);
        }
    });
}

/// Debug panel editing the live scene settings.
pub fn settings_panel_system(
    mut contexts: EguiContexts,
    ui_state: Res<UiState>,
    mut settings: ResMut<SceneSettings>,
    mut regenerate: EventWriter<RegenerateScenery>,
    mut save: EventWriter<SaveSettings>,
) {
    if !ui_state.panel_open {
        return;
    }
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let mut edited = settings.clone();
    egui::Window::new("Aquarium")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Water");
            color_row(ui, "Color", &mut edited.water_color);
            ui.add(egui::Slider::new(&mut edited.water_density, 0.0..=1.0).text("Density"));

            ui.separator();
            ui.heading("Plants");
            ui.add(
                egui::Slider::new(&mut edited.plant_density, 0.0..=MAX_PLANT_DENSITY)
                    .text("Density"),
            );
            ui.add(
                egui::Slider::new(&mut edited.plant_variety, 1..=LEAF_PRESETS.len() as u32)
                    .text("Variety"),
            );
            color_row(ui, "Color", &mut edited.plant_color);

            ui.separator();
            ui.heading("Scene");
            ui.add(egui::Slider::new(&mut edited.light_intensity, 0.0..=3.0).text("Light"));
            ui.add(egui::Slider::new(&mut edited.fish_count, 0..=MAX_FISH).text("Fish"));

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Regenerate scenery").clicked() {
                    regenerate.write(RegenerateScenery);
                }
                if ui.button("Save settings").clicked() {
                    save.write(SaveSettings);
                }
            });
            ui.small("F1 inspector, F2 panel");
        });

    if edited != *settings {
        *settings = edited;
    }
}
