//! Protection view - schedule inputs, presets and start/stop controls

use egui::RichText;

use crate::dashboard::components::{CardStatus, StatusCard};
use crate::dashboard::state::{
    ControlAction, ControlAvailability, DashboardState, DURATION_PRESETS, INTERVAL_PRESETS,
};
use crate::dashboard::theme::ThemeColors;
use crate::notifier::Notifier;
use crate::scheduler::ProtectionScheduler;

/// Render the protection view; returns the button pressed this frame
pub fn render_protection_view<N: Notifier>(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    scheduler: &ProtectionScheduler<N>,
) -> Option<ControlAction> {
    let protection = scheduler.state();
    let controls = ControlAvailability::for_state(protection);
    let mut action = None;

    ui.heading(RichText::new("Eye Protection").size(24.0).strong());
    ui.add_space(8.0);
    ui.label(
        RichText::new("Rest your eyes regularly with a short full-screen break")
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY)
    );

    ui.add_space(24.0);

    let card_title = if scheduler.is_break_active() {
        "Break in progress"
    } else {
        "Next break"
    };
    StatusCard::new(
        card_title,
        scheduler.time_remaining_text(),
        CardStatus::from(protection),
    )
    .show(ui);

    ui.add_space(12.0);
    ui.label(RichText::new(scheduler.status_text()).color(ThemeColors::TEXT_SECONDARY));

    ui.add_space(24.0);

    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.heading(RichText::new("Schedule").size(16.0));
            ui.add_space(12.0);

            ui.add_enabled_ui(controls.inputs, |ui| {
                egui::Grid::new("schedule_inputs")
                    .num_columns(2)
                    .spacing([16.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Break every (minutes):");
                        ui.add(egui::TextEdit::singleline(&mut state.interval_input).desired_width(80.0));
                        ui.end_row();

                        ui.label("Quick presets:");
                        ui.horizontal(|ui| {
                            for minutes in INTERVAL_PRESETS {
                                if ui.button(format!("{} min", minutes)).clicked() {
                                    state.apply_interval_preset(minutes);
                                }
                            }
                        });
                        ui.end_row();

                        ui.label("Break duration (seconds):");
                        ui.add(egui::TextEdit::singleline(&mut state.duration_input).desired_width(80.0));
                        ui.end_row();

                        ui.label("Quick presets:");
                        ui.horizontal(|ui| {
                            for secs in DURATION_PRESETS {
                                if ui.button(format!("{} s", secs)).clicked() {
                                    state.apply_duration_preset(secs);
                                }
                            }
                        });
                        ui.end_row();
                    });
            });
        });

    ui.add_space(16.0);

    ui.horizontal(|ui| {
        let start = egui::Button::new(RichText::new("Start Protection").strong())
            .fill(ThemeColors::ACCENT_PRIMARY);
        if ui.add_enabled(controls.start, start).clicked() {
            action = Some(ControlAction::Start);
        }
        if ui.add_enabled(controls.stop, egui::Button::new("Stop Protection")).clicked() {
            action = Some(ControlAction::Stop);
        }
        if ui.add_enabled(controls.minimize, egui::Button::new("Minimize to Tray")).clicked() {
            action = Some(ControlAction::Minimize);
        }
    });

    action
}
