//! Dashboard application entry point

use crossbeam_channel::Receiver;
use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::capture::PrimaryDisplayCapture;
use crate::commands::{action_channel, CommandTable, UserAction};
use crate::config::{self, AppConfig};
use crate::dashboard::components::render_sidebar;
use crate::dashboard::controller::{command_table, Controller};
use crate::dashboard::state::{DashboardState, DashboardView};
use crate::dashboard::theme;
use crate::dashboard::views::{render_protection_view, render_settings_view};
use crate::hotkey::HotkeyManager;
use crate::overlay::{OverlayConfig, OverlayHost};
use crate::tray::{self, TrayNotifier};

/// Timers are polled from `update`, so the UI must wake at least this often
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// How the app should come up
#[derive(Debug, Clone, Copy, Default)]
pub struct StartupOptions {
    /// Begin protection with the configured schedule right away
    pub start_protection: bool,
    /// Start minimized to the tray
    pub start_minimized: bool,
}

/// The main dashboard application
pub struct BreakBuddyApp {
    controller: Controller<TrayNotifier>,
    commands: CommandTable<Controller<TrayNotifier>>,
    /// Tray and hotkey actions, queued from the platform event loop
    actions: Receiver<UserAction>,
    overlay: OverlayHost,
    hotkeys: Option<HotkeyManager>,
    config: AppConfig,
    config_path: PathBuf,
    theme_applied: bool,
    announced: bool,
}

impl BreakBuddyApp {
    /// Create the app; must run after the event loop exists so the tray can attach
    pub fn new(
        ctx: &egui::Context,
        config: AppConfig,
        config_path: PathBuf,
        startup: StartupOptions,
    ) -> Self {
        let (sender, actions) = action_channel({
            let ctx = ctx.clone();
            move || ctx.request_repaint()
        });
        tray::install_event_handlers(sender.clone());

        let notifier = TrayNotifier::new(config.general.notifications);
        let overlay = OverlayHost::new(
            OverlayConfig::from_settings(&config.overlay),
            Box::new(PrimaryDisplayCapture),
        );

        let hotkeys = match HotkeyManager::new(config.general.toggle_hotkey.as_deref(), sender) {
            Ok(manager) => Some(manager),
            Err(e) => {
                warn!("Global hotkey unavailable: {}", e);
                None
            }
        };

        let mut controller = Controller::new(notifier, DashboardState::from_config(&config));
        if startup.start_protection {
            if let Err(e) = controller.start_protection(Instant::now()) {
                warn!("Could not start protection on launch: {}", e);
            }
        }

        Self {
            controller,
            commands: command_table(),
            actions,
            overlay,
            hotkeys,
            config,
            config_path,
            theme_applied: false,
            announced: false,
        }
    }

    /// Run every action the tray and hotkey queued since the last frame
    fn drain_actions(&mut self) {
        for action in self.actions.try_iter() {
            if !self.commands.dispatch(action, &mut self.controller) {
                warn!("No handler registered for {:?}", action);
            }
        }
    }

    /// Persist the settings and apply them to the running app
    fn save_settings(&mut self) {
        self.controller.dashboard.settings.save_message =
            Some(match config::save_config(&self.config, &self.config_path) {
                Ok(()) => {
                    info!("Saved configuration to {:?}", self.config_path);
                    "Settings saved".to_string()
                }
                Err(e) => {
                    warn!("Failed to save configuration: {}", e);
                    format!("Failed to save settings: {}", e)
                }
            });

        self.overlay
            .set_config(OverlayConfig::from_settings(&self.config.overlay));
        self.controller
            .scheduler
            .notifier_mut()
            .set_notifications(self.config.general.notifications);

        if let Some(hotkeys) = self.hotkeys.as_mut() {
            match self.config.general.toggle_hotkey.as_deref() {
                Some(hotkey) => {
                    if let Err(e) = hotkeys.register_toggle(hotkey) {
                        warn!("Failed to apply toggle hotkey: {}", e);
                    }
                }
                None => hotkeys.unregister_toggle(),
            }
        }
    }

    fn render_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.dashboard.error_dialog.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("BreakBuddy")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.controller.dashboard.error_dialog = None;
        }
    }

    /// Create eframe options for the dashboard window
    ///
    /// The window always exists and is shown; starting minimized only
    /// iconifies it, so frames keep driving the timers.
    pub fn options(start_minimized: bool) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([720.0, 560.0])
                .with_min_inner_size([560.0, 440.0])
                .with_title("BreakBuddy")
                .with_visible(true)
                .with_minimized(start_minimized),
            ..Default::default()
        }
    }
}

impl eframe::App for BreakBuddyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        if !self.announced {
            tray::announce_startup(self.controller.scheduler.notifier_mut());
            self.announced = true;
        }

        self.drain_actions();

        let now = Instant::now();
        self.controller.scheduler.poll(now, &mut self.overlay);
        self.overlay.show(ctx, now);

        let dashboard = &mut self.controller.dashboard;
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| {
                render_sidebar(ui, &mut dashboard.current_view);
            });

        let mut control = None;
        let mut save = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none()
                .inner_margin(24.0)
                .show(ui, |ui| match dashboard.current_view {
                    DashboardView::Protection => {
                        control = render_protection_view(
                            ui,
                            dashboard,
                            &self.controller.scheduler,
                        );
                    }
                    DashboardView::Settings => {
                        save = render_settings_view(
                            ui,
                            &mut dashboard.settings,
                            &mut self.config,
                        );
                    }
                });
        });

        if let Some(action) = control {
            self.controller.handle_control(action, Instant::now());
        }
        if save {
            self.save_settings();
        }

        self.render_error_dialog(ctx);

        for command in self.controller.take_viewport_commands() {
            ctx.send_viewport_cmd(command);
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

/// Run the dashboard application
pub fn run_dashboard(
    config: AppConfig,
    config_path: PathBuf,
    startup: StartupOptions,
) -> Result<(), eframe::Error> {
    eframe::run_native(
        "BreakBuddy",
        BreakBuddyApp::options(startup.start_minimized),
        Box::new(move |cc| {
            Ok(Box::new(BreakBuddyApp::new(
                &cc.egui_ctx,
                config,
                config_path,
                startup,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_minimized_keeps_window_visible() {
        let minimized = BreakBuddyApp::options(true).viewport;
        assert_eq!(minimized.visible, Some(true));
        assert_eq!(minimized.minimized, Some(true));

        let normal = BreakBuddyApp::options(false).viewport;
        assert_eq!(normal.visible, Some(true));
        assert_eq!(normal.minimized, Some(false));
    }
}
