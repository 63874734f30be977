//! System tray icon, menu and desktop notifications
//!
//! The tray only reports which menu item was picked; the command table owns
//! what happens next. Every failure in here is logged and swallowed.

use notify_rust::{Notification, Timeout};
use tracing::{debug, info, warn};

use crate::commands::{ActionSender, UserAction};
use crate::notifier::Notifier;

/// Tooltip shown before protection starts
#[cfg_attr(target_os = "linux", allow(dead_code))]
pub const DEFAULT_TOOLTIP: &str = "BreakBuddy - Eye Protection";

#[cfg_attr(target_os = "linux", allow(dead_code))]
const ICON_SIZE: u32 = 32;

/// Label of the toggle menu item for the given protection state
pub fn toggle_label(active: bool, paused: bool) -> &'static str {
    if paused {
        "Resume Protection"
    } else if active {
        "Pause Protection"
    } else {
        "Start Protection"
    }
}

/// RGBA pixels for the tray icon: a teal disc with a dark pupil
#[cfg_attr(target_os = "linux", allow(dead_code))]
pub fn icon_rgba(size: u32) -> Vec<u8> {
    let center = (size as f32 - 1.0) / 2.0;
    let outer = size as f32 / 2.0;
    let pupil = outer * 0.4;

    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            let pixel = if dist <= pupil {
                [24, 32, 40, 255]
            } else if dist <= outer {
                [46, 170, 160, 255]
            } else {
                [0, 0, 0, 0]
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    rgba
}

/// Queue the action behind a menu item id; unknown ids are ignored
#[cfg_attr(target_os = "linux", allow(dead_code))]
pub fn forward_menu_id(id: &str, actions: &ActionSender) -> bool {
    match UserAction::from_id(id) {
        Some(action) => {
            actions.send(action);
            true
        }
        None => {
            debug!("Ignoring unknown tray menu item '{}'", id);
            false
        }
    }
}

/// Route tray menu picks and icon clicks into the action queue
pub fn install_event_handlers(actions: ActionSender) {
    platform::install_event_handlers(actions);
}

/// Notifier backed by the tray icon and desktop notifications
pub struct TrayNotifier {
    tray: Option<platform::TrayHandle>,
    notifications: bool,
}

impl TrayNotifier {
    /// Create the tray icon; the notifier still works without one
    pub fn new(notifications: bool) -> Self {
        let tray = match platform::TrayHandle::create() {
            Ok(tray) => {
                info!("System tray icon created");
                Some(tray)
            }
            Err(e) => {
                warn!("System tray unavailable: {}", e);
                None
            }
        };
        Self {
            tray,
            notifications,
        }
    }

    /// Notifier with no tray icon
    #[cfg(test)]
    pub fn without_tray(notifications: bool) -> Self {
        Self {
            tray: None,
            notifications,
        }
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications = enabled;
    }

    #[cfg(test)]
    pub fn has_tray(&self) -> bool {
        self.tray.is_some()
    }
}

impl Notifier for TrayNotifier {
    fn update_status(&mut self, status: &str, active: bool, paused: bool) {
        if let Some(tray) = &self.tray {
            tray.set_tooltip(&format!("BreakBuddy - {}", status));
            tray.set_toggle_label(toggle_label(active, paused));
        }
    }

    fn update_tooltip(&mut self, tooltip: &str) {
        if let Some(tray) = &self.tray {
            tray.set_tooltip(tooltip);
        }
    }

    fn show_notification(&mut self, title: &str, message: &str) {
        if !self.notifications {
            return;
        }
        debug!("Notification: {} - {}", title, message);
        if let Err(e) = Notification::new()
            .appname("BreakBuddy")
            .summary(title)
            .body(message)
            .timeout(Timeout::Milliseconds(3000))
            .show()
        {
            warn!("Failed to show notification '{}': {}", title, e);
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    use anyhow::{anyhow, Result};
    use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
    use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
    use tracing::warn;

    use super::{forward_menu_id, icon_rgba, toggle_label, DEFAULT_TOOLTIP, ICON_SIZE};
    use crate::commands::{ActionSender, UserAction};

    pub struct TrayHandle {
        icon: TrayIcon,
        toggle_item: MenuItem,
    }

    impl TrayHandle {
        pub fn create() -> Result<Self> {
            let open = MenuItem::with_id(UserAction::Open.id(), "Open BreakBuddy", true, None);
            let toggle_item = MenuItem::with_id(
                UserAction::ToggleProtection.id(),
                toggle_label(false, false),
                true,
                None,
            );
            let exit = MenuItem::with_id(UserAction::Exit.id(), "Exit BreakBuddy", true, None);

            let menu = Menu::new();
            menu.append_items(&[&open, &toggle_item, &PredefinedMenuItem::separator(), &exit])
                .map_err(|e| anyhow!("Failed to build tray menu: {:?}", e))?;

            let icon = Icon::from_rgba(icon_rgba(ICON_SIZE), ICON_SIZE, ICON_SIZE)
                .map_err(|e| anyhow!("Failed to build tray icon: {:?}", e))?;

            let icon = TrayIconBuilder::new()
                .with_menu(Box::new(menu))
                .with_tooltip(DEFAULT_TOOLTIP)
                .with_icon(icon)
                .with_menu_on_left_click(false)
                .build()
                .map_err(|e| anyhow!("Failed to create tray icon: {:?}", e))?;

            Ok(Self { icon, toggle_item })
        }

        pub fn set_tooltip(&self, tooltip: &str) {
            if let Err(e) = self.icon.set_tooltip(Some(tooltip)) {
                warn!("Failed to update tray tooltip: {:?}", e);
            }
        }

        pub fn set_toggle_label(&self, label: &str) {
            self.toggle_item.set_text(label);
        }
    }

    pub fn install_event_handlers(actions: ActionSender) {
        let menu_actions = actions.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            forward_menu_id(event.id.as_ref(), &menu_actions);
        }));

        TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                actions.send(UserAction::Open);
            }
        }));
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use anyhow::{anyhow, Result};

    use crate::commands::ActionSender;

    pub struct TrayHandle;

    impl TrayHandle {
        pub fn create() -> Result<Self> {
            Err(anyhow!("tray icon is not supported on this platform"))
        }

        pub fn set_tooltip(&self, _tooltip: &str) {}

        pub fn set_toggle_label(&self, _label: &str) {}
    }

    pub fn install_event_handlers(_actions: ActionSender) {}
}

/// Show the one-off startup notification
pub fn announce_startup(notifier: &mut dyn Notifier) {
    notifier.show_notification("BreakBuddy Started", "Eye protection app is ready to use!");
}
