//! Settings view - overlay and general preferences

use egui::RichText;

use crate::config::AppConfig;
use crate::dashboard::state::{SettingsSection, SettingsViewState};
use crate::dashboard::theme::ThemeColors;

/// Render the settings view; returns true when the user asked to save
pub fn render_settings_view(
    ui: &mut egui::Ui,
    view_state: &mut SettingsViewState,
    config: &mut AppConfig,
) -> bool {
    ui.heading(RichText::new("Settings").size(24.0).strong());
    ui.add_space(8.0);
    ui.label(
        RichText::new("Changes apply from the next break once saved")
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY)
    );

    ui.add_space(24.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        section(ui, view_state, SettingsSection::Overlay, "Break Overlay", |ui| {
            ui.horizontal(|ui| {
                ui.label("Background blur:");
                ui.add(egui::Slider::new(&mut config.overlay.blur_radius, 0..=40));
            });

            ui.horizontal(|ui| {
                ui.label("Skip key:");
                ui.add(egui::TextEdit::singleline(&mut config.overlay.skip_key).desired_width(120.0));
            });

            ui.horizontal(|ui| {
                ui.label("Fallback background:");
                ui.color_edit_button_srgb(&mut config.overlay.fallback_color);
            });
        });

        ui.add_space(16.0);

        section(ui, view_state, SettingsSection::General, "General", |ui| {
            ui.checkbox(&mut config.general.notifications, "Show desktop notifications");
            ui.checkbox(&mut config.general.start_minimized, "Start minimized to tray");
            ui.checkbox(&mut config.schedule.autostart, "Start protection on launch");

            ui.horizontal(|ui| {
                ui.label("Toggle hotkey:");
                let mut hotkey = config.general.toggle_hotkey.clone().unwrap_or_default();
                if ui
                    .add(egui::TextEdit::singleline(&mut hotkey).hint_text("e.g. Ctrl+Alt+B"))
                    .changed()
                {
                    let hotkey = hotkey.trim();
                    config.general.toggle_hotkey = (!hotkey.is_empty()).then(|| hotkey.to_string());
                }
            });
        });

        ui.add_space(24.0);

        let save = ui.button("Save Settings").clicked();
        if let Some(message) = &view_state.save_message {
            ui.add_space(8.0);
            ui.label(RichText::new(message).size(12.0).color(ThemeColors::TEXT_MUTED));
        }
        save
    })
    .inner
}

/// Collapsible settings card; only one section is open at a time
fn section(
    ui: &mut egui::Ui,
    view_state: &mut SettingsViewState,
    which: SettingsSection,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui),
) {
    let expanded = view_state.expanded_section == Some(which);
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(16.0)
        .show(ui, |ui| {
            let header = ui
                .horizontal(|ui| {
                    let arrow = if expanded { "v" } else { ">" };
                    ui.label(RichText::new(arrow).size(12.0).color(ThemeColors::TEXT_MUTED));
                    ui.add_space(8.0);
                    ui.heading(RichText::new(title).size(16.0));
                })
                .response;

            if header.interact(egui::Sense::click()).clicked() {
                view_state.expanded_section = if expanded { None } else { Some(which) };
            }

            if expanded {
                ui.add_space(16.0);
                ui.separator();
                ui.add_space(12.0);
                add_contents(ui);
            }
        });
}
