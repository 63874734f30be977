//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::capture::blur::DEFAULT_BLUR_RADIUS;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Break schedule settings
    pub schedule: ScheduleSettings,
    /// Break overlay settings
    pub overlay: OverlaySettings,
    /// General settings
    pub general: GeneralConfig,
}

/// Break schedule settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Minutes between breaks
    pub interval_minutes: i64,
    /// Length of each break in seconds
    pub break_duration_secs: i64,
    /// Start protection as soon as the app launches
    pub autostart: bool,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            interval_minutes: 25,
            break_duration_secs: 20,
            autostart: false,
        }
    }
}

/// Break overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Blur radius applied to the captured screen
    pub blur_radius: u32,
    /// Key that skips a break inside the skip window (egui key name)
    pub skip_key: String,
    /// Background colour used when the screen cannot be captured (RGB)
    pub fallback_color: [u8; 3],
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            skip_key: "Escape".to_string(),
            fallback_color: [47, 79, 79],
        }
    }
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Start with the window minimized
    pub start_minimized: bool,
    /// Global hotkey that toggles protection, e.g. "Ctrl+Alt+B"
    pub toggle_hotkey: Option<String>,
    /// Show desktop notifications
    pub notifications: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_minimized: false,
            toggle_hotkey: Some("Ctrl+Alt+B".to_string()),
            notifications: true,
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "breakbuddy", "BreakBuddy")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file is
/// missing or unreadable
pub fn load_or_default(path: &Path) -> AppConfig {
    if !path.exists() {
        info!("No configuration at {:?}, using defaults", path);
        return AppConfig::default();
    }

    match load_config(path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load configuration from {:?}: {}", path, e);
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.schedule.interval_minutes, 25);
        assert_eq!(config.schedule.break_duration_secs, 20);
        assert!(!config.schedule.autostart);

        assert_eq!(config.overlay.blur_radius, 15);
        assert_eq!(config.overlay.skip_key, "Escape");
        assert_eq!(config.overlay.fallback_color, [47, 79, 79]);

        assert!(!config.general.start_minimized);
        assert_eq!(config.general.toggle_hotkey.as_deref(), Some("Ctrl+Alt+B"));
        assert!(config.general.notifications);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.schedule.interval_minutes = 45;
        config.schedule.break_duration_secs = 60;
        config.overlay.skip_key = "Space".to_string();
        config.general.toggle_hotkey = None;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[schedule]\ninterval_minutes = 40\n").unwrap();

        assert_eq!(parsed.schedule.interval_minutes, 40);
        assert_eq!(parsed.schedule.break_duration_secs, 20);
        assert_eq!(parsed.overlay, OverlaySettings::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.schedule.autostart = true;

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert!(loaded.schedule.autostart);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[schedule]\ninterval_minutes = \"soon\"").unwrap();

        assert_eq!(load_or_default(temp_file.path()), AppConfig::default());
        assert_eq!(
            load_or_default(Path::new("/nonexistent/path/config.toml")),
            AppConfig::default()
        );
    }
}
