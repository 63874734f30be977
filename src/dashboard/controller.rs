//! Dashboard controller
//!
//! Everything the buttons, tray menu and hotkey can do to the app, kept apart
//! from the egui frame so it can run against any notifier.

use eframe::egui::ViewportCommand;
use std::time::Instant;
use tracing::{info, warn};

use crate::commands::{CommandTable, UserAction};
use crate::dashboard::state::{ControlAction, DashboardState};
use crate::error::ScheduleError;
use crate::notifier::Notifier;
use crate::scheduler::ProtectionScheduler;

/// Scheduler, dashboard state and pending window commands
pub struct Controller<N: Notifier> {
    pub scheduler: ProtectionScheduler<N>,
    pub dashboard: DashboardState,
    /// Window commands queued by handlers until the next frame
    viewport_commands: Vec<ViewportCommand>,
}

impl<N: Notifier> Controller<N> {
    pub fn new(notifier: N, dashboard: DashboardState) -> Self {
        Self {
            scheduler: ProtectionScheduler::new(notifier),
            dashboard,
            viewport_commands: Vec::new(),
        }
    }

    /// Start protection with the values currently in the inputs
    pub fn start_protection(&mut self, now: Instant) -> Result<(), ScheduleError> {
        let (interval, duration) = self.dashboard.parsed_inputs();
        self.scheduler.start(interval, duration, now)
    }

    /// Tray/hotkey toggle; a rejected start brings the window up with the dialog
    pub fn toggle_protection(&mut self, now: Instant) {
        let (interval, duration) = self.dashboard.parsed_inputs();
        if let Err(e) = self.scheduler.toggle(interval, duration, now) {
            self.show_error(e);
            self.show_window();
        }
    }

    pub fn handle_control(&mut self, action: ControlAction, now: Instant) {
        match action {
            ControlAction::Start => {
                if let Err(e) = self.start_protection(now) {
                    self.show_error(e);
                }
            }
            ControlAction::Stop => self.scheduler.stop(),
            ControlAction::Minimize => self.minimize_to_tray(),
        }
    }

    pub fn show_error(&mut self, error: ScheduleError) {
        match &error {
            ScheduleError::InvalidSettings {
                interval_minutes,
                break_duration_secs,
            } => warn!(
                "Rejected schedule: interval {} min, break {} s",
                interval_minutes, break_duration_secs
            ),
            ScheduleError::AlreadyActive => warn!("Protection is already active"),
        }
        self.dashboard.error_dialog = Some(error.to_string());
    }

    pub fn show_window(&mut self) {
        self.viewport_commands.extend([
            ViewportCommand::Visible(true),
            ViewportCommand::Minimized(false),
            ViewportCommand::Focus,
        ]);
    }

    /// Minimized, never hidden; timers only advance while frames keep coming
    pub fn minimize_to_tray(&mut self) {
        self.viewport_commands.push(ViewportCommand::Minimized(true));
        self.scheduler.notifier_mut().show_notification(
            "BreakBuddy Minimized",
            "BreakBuddy is running in the background. Eye protection continues!",
        );
    }

    pub fn request_exit(&mut self) {
        info!("Exit requested");
        self.viewport_commands.push(ViewportCommand::Close);
    }

    /// Window commands queued since the last call
    pub fn take_viewport_commands(&mut self) -> Vec<ViewportCommand> {
        std::mem::take(&mut self.viewport_commands)
    }
}

/// Handlers for tray menu items and the hotkey
pub fn command_table<N: Notifier + 'static>() -> CommandTable<Controller<N>> {
    let mut table = CommandTable::new();
    table
        .register(UserAction::Open, |c: &mut Controller<N>| c.show_window())
        .register(UserAction::ToggleProtection, |c: &mut Controller<N>| {
            c.toggle_protection(Instant::now())
        })
        .register(UserAction::Exit, |c: &mut Controller<N>| c.request_exit());
    table
}
