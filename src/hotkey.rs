//! Global hotkey handling for the protection toggle

use anyhow::{anyhow, Result};
use global_hotkey::{
    hotkey::{Code, HotKey, Modifiers},
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::commands::{ActionSender, UserAction};

/// Stored toggle id when no hotkey is registered
const NO_HOTKEY: u32 = 0;

/// Parses a hotkey string like "F9", "Ctrl+Shift+O", "Alt+F1" into a HotKey
pub fn parse_hotkey(hotkey_str: &str) -> Result<HotKey> {
    let parts: Vec<&str> = hotkey_str.split('+').map(|s| s.trim()).collect();

    let mut modifiers = Modifiers::empty();
    let mut key_code: Option<Code> = None;

    for part in parts {
        let upper = part.to_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => modifiers |= Modifiers::CONTROL,
            "SHIFT" => modifiers |= Modifiers::SHIFT,
            "ALT" => modifiers |= Modifiers::ALT,
            "WIN" | "SUPER" | "META" => modifiers |= Modifiers::SUPER,
            _ => {
                // This should be the key code
                key_code = Some(parse_key_code(&upper)?);
            }
        }
    }

    let code = key_code.ok_or_else(|| anyhow!("No key code found in hotkey string"))?;
    Ok(HotKey::new(Some(modifiers), code))
}

const LETTERS: [Code; 26] = [
    Code::KeyA, Code::KeyB, Code::KeyC, Code::KeyD, Code::KeyE, Code::KeyF, Code::KeyG,
    Code::KeyH, Code::KeyI, Code::KeyJ, Code::KeyK, Code::KeyL, Code::KeyM, Code::KeyN,
    Code::KeyO, Code::KeyP, Code::KeyQ, Code::KeyR, Code::KeyS, Code::KeyT, Code::KeyU,
    Code::KeyV, Code::KeyW, Code::KeyX, Code::KeyY, Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0, Code::Digit1, Code::Digit2, Code::Digit3, Code::Digit4,
    Code::Digit5, Code::Digit6, Code::Digit7, Code::Digit8, Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1, Code::F2, Code::F3, Code::F4, Code::F5, Code::F6,
    Code::F7, Code::F8, Code::F9, Code::F10, Code::F11, Code::F12,
];

/// Parse an upper-cased key name into a Code
fn parse_key_code(key: &str) -> Result<Code> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() {
            return Ok(LETTERS[(c as u8 - b'A') as usize]);
        }
        if c.is_ascii_digit() {
            return Ok(DIGITS[(c as u8 - b'0') as usize]);
        }
    }

    if let Some(n) = key.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
        if (1..=FUNCTION_KEYS.len()).contains(&n) {
            return Ok(FUNCTION_KEYS[n - 1]);
        }
    }

    let code = match key {
        "SPACE" => Code::Space,
        "ENTER" | "RETURN" => Code::Enter,
        "TAB" => Code::Tab,
        "ESCAPE" | "ESC" => Code::Escape,
        "PAUSE" => Code::Pause,
        "HOME" => Code::Home,
        "END" => Code::End,
        "INSERT" | "INS" => Code::Insert,
        "DELETE" | "DEL" => Code::Delete,
        "PAGEUP" | "PGUP" => Code::PageUp,
        "PAGEDOWN" | "PGDN" => Code::PageDown,
        _ => return Err(anyhow!("Unknown key code: {}", key)),
    };

    Ok(code)
}

/// Action for a hotkey event, given the id of the registered toggle
fn toggle_action(id: u32, state: HotKeyState, toggle_id: u32) -> Option<UserAction> {
    (toggle_id != NO_HOTKEY && id == toggle_id && state == HotKeyState::Pressed)
        .then_some(UserAction::ToggleProtection)
}

/// Global hotkey that toggles protection
///
/// Presses are delivered from the platform event loop straight into the
/// action queue, so they arrive even while the window is not drawing.
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    toggle: Option<HotKey>,
    toggle_id: Arc<AtomicU32>,
}

impl HotkeyManager {
    /// Create the manager and register `toggle_hotkey` if one is configured
    pub fn new(toggle_hotkey: Option<&str>, actions: ActionSender) -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| anyhow!("Failed to create hotkey manager: {:?}", e))?;

        let toggle_id = Arc::new(AtomicU32::new(NO_HOTKEY));
        let handler_id = Arc::clone(&toggle_id);
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            let toggle = handler_id.load(Ordering::Relaxed);
            if let Some(action) = toggle_action(event.id, event.state, toggle) {
                info!("Protection toggle hotkey pressed");
                actions.send(action);
            }
        }));

        let mut this = Self {
            manager,
            toggle: None,
            toggle_id,
        };
        if let Some(hotkey_str) = toggle_hotkey {
            this.register_toggle(hotkey_str)?;
        }
        Ok(this)
    }

    /// Register (or replace) the protection toggle hotkey
    pub fn register_toggle(&mut self, hotkey_str: &str) -> Result<()> {
        self.unregister_toggle();

        let hotkey = match parse_hotkey(hotkey_str) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                warn!("Failed to parse hotkey '{}': {}", hotkey_str, e);
                return Err(e);
            }
        };

        self.manager
            .register(hotkey)
            .map_err(|e| anyhow!("Failed to register hotkey: {:?}", e))?;
        self.toggle = Some(hotkey);
        self.toggle_id.store(hotkey.id(), Ordering::Relaxed);
        info!("Registered protection toggle hotkey: {}", hotkey_str);

        Ok(())
    }

    /// Unregister the toggle hotkey
    pub fn unregister_toggle(&mut self) {
        self.toggle_id.store(NO_HOTKEY, Ordering::Relaxed);
        if let Some(hotkey) = self.toggle.take() {
            let _ = self.manager.unregister(hotkey);
        }
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        self.unregister_toggle();
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let hotkey = parse_hotkey("F9").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let hotkey = parse_hotkey("Ctrl+Shift+O").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_default_toggle() {
        let hotkey = parse_hotkey("Ctrl+Alt+B").unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::KeyB)
        );
    }

    #[test]
    fn test_parse_is_case_and_space_insensitive() {
        assert_eq!(
            parse_hotkey("ctrl + shift + f9").unwrap(),
            parse_hotkey("Ctrl+Shift+F9").unwrap()
        );
    }

    #[test]
    fn test_parse_function_key_bounds() {
        assert!(parse_hotkey("F12").is_ok());
        assert!(parse_hotkey("F13").is_err());
        assert!(parse_hotkey("F0").is_err());
    }

    #[test]
    fn test_parse_modifiers_only() {
        assert!(parse_hotkey("Ctrl+Alt").is_err());
    }

    #[test]
    fn test_parse_invalid_key() {
        let result = parse_hotkey("InvalidKey");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty() {
        let result = parse_hotkey("");
        assert!(result.is_err());
    }

    #[test]
    fn test_toggle_action_only_on_press_of_toggle() {
        let toggle = parse_hotkey("Ctrl+Alt+B").unwrap().id();
        let other = parse_hotkey("F9").unwrap().id();

        assert_eq!(
            toggle_action(toggle, HotKeyState::Pressed, toggle),
            Some(UserAction::ToggleProtection)
        );
        assert_eq!(toggle_action(toggle, HotKeyState::Released, toggle), None);
        assert_eq!(toggle_action(other, HotKeyState::Pressed, toggle), None);
    }

    #[test]
    fn test_toggle_action_ignored_without_hotkey() {
        assert_eq!(toggle_action(NO_HOTKEY, HotKeyState::Pressed, NO_HOTKEY), None);
    }
}
