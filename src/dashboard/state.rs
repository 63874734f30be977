//! Dashboard view state management

use crate::config::AppConfig;
use crate::scheduler::ProtectionState;

/// Interval presets offered next to the interval input, in minutes
pub const INTERVAL_PRESETS: [i64; 4] = [20, 30, 45, 60];

/// Break duration presets, in seconds
pub const DURATION_PRESETS: [i64; 3] = [20, 30, 60];

/// Current view in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Protection,
    Settings,
}

impl DashboardView {
    pub const ALL: [DashboardView; 2] = [Self::Protection, Self::Settings];

    /// Get the display name for this view
    pub fn name(&self) -> &'static str {
        match self {
            DashboardView::Protection => "Protection",
            DashboardView::Settings => "Settings",
        }
    }

    /// Get the icon character for this view
    pub fn icon(&self) -> &'static str {
        match self {
            DashboardView::Protection => "P",
            DashboardView::Settings => "S",
        }
    }
}

/// Which controls on the protection view are usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlAvailability {
    pub inputs: bool,
    pub start: bool,
    pub stop: bool,
    pub minimize: bool,
}

impl ControlAvailability {
    pub fn for_state(state: ProtectionState) -> Self {
        let stopped = state == ProtectionState::Stopped;
        Self {
            inputs: stopped,
            start: stopped,
            stop: !stopped,
            minimize: !stopped,
        }
    }
}

/// Button pressed on the protection view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Minimize,
}

/// Settings section currently expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    Overlay,
    General,
}

/// State for the settings view
#[derive(Debug, Clone, Default)]
pub struct SettingsViewState {
    pub expanded_section: Option<SettingsSection>,
    /// Result of the last save, shown under the save button
    pub save_message: Option<String>,
}

/// Complete dashboard state
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub current_view: DashboardView,
    /// Raw interval input, in minutes
    pub interval_input: String,
    /// Raw break duration input, in seconds
    pub duration_input: String,
    /// Message for the validation dialog, if one is open
    pub error_dialog: Option<String>,
    pub settings: SettingsViewState,
}

impl DashboardState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval_input: config.schedule.interval_minutes.to_string(),
            duration_input: config.schedule.break_duration_secs.to_string(),
            ..Default::default()
        }
    }

    /// Interval and duration as typed; anything unparsable reads as 0 so the
    /// scheduler rejects it
    pub fn parsed_inputs(&self) -> (i64, i64) {
        (parse_input(&self.interval_input), parse_input(&self.duration_input))
    }

    pub fn apply_interval_preset(&mut self, minutes: i64) {
        self.interval_input = minutes.to_string();
    }

    pub fn apply_duration_preset(&mut self, secs: i64) {
        self.duration_input = secs.to_string();
    }
}

fn parse_input(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}
