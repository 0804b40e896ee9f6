use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_false")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            console_logging_enabled: default_true(),
            file_logging_enabled: default_false(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "roomctl".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Advertised BLE name the scanner matches against.
    #[serde(default = "default_bulb_name")]
    pub bulb_name: String,
    /// Length of one scan pass in seconds.
    #[serde(default = "default_scan_seconds")]
    pub scan_seconds: u64,

    /// Bind address of the bulb service.
    #[serde(default = "default_http_bind")]
    pub http_bind: String,
    /// Base URL the gesture controller posts bulb commands to.
    #[serde(default = "default_bulb_service_url")]
    pub bulb_service_url: String,

    /// Command line of the hand-landmark detector sidecar.
    #[serde(default = "default_tracker_command")]
    pub tracker_command: Vec<String>,

    /// Shared throttle window for mode-driven emissions, in milliseconds.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Normalized pinch distance at or below which a mode activates.
    #[serde(default = "default_activation_threshold")]
    pub activation_threshold: f64,
    /// Normalized release distance above which the active mode clears.
    #[serde(default = "default_release_threshold")]
    pub release_threshold: f64,

    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bulb_name: default_bulb_name(),
            scan_seconds: default_scan_seconds(),
            http_bind: default_http_bind(),
            bulb_service_url: default_bulb_service_url(),
            tracker_command: default_tracker_command(),
            update_interval_ms: default_update_interval_ms(),
            activation_threshold: default_activation_threshold(),
            release_threshold: default_release_threshold(),
            log_settings: LogSettings::default(),
        }
    }
}

fn default_bulb_name() -> String {
    "Hue color lamp".to_string()
}
fn default_scan_seconds() -> u64 {
    5
}
fn default_http_bind() -> String {
    "0.0.0.0:5000".to_string()
}
fn default_bulb_service_url() -> String {
    "http://10.0.0.88:5000".to_string()
}
fn default_tracker_command() -> Vec<String> {
    vec!["python3".to_string(), "scripts/hand_tracker.py".to_string()]
}
fn default_update_interval_ms() -> u64 {
    500
}
fn default_activation_threshold() -> f64 {
    0.3
}
fn default_release_threshold() -> f64 {
    0.6
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::settings_path()?;

        match Self::load_from_file(&settings_path) {
            Ok(settings) => Ok(Self {
                settings,
                settings_path,
            }),
            Err(_) => {
                // First run (or unreadable file): persist the defaults so
                // there is a file to edit.
                let service = Self {
                    settings: Settings::default(),
                    settings_path,
                };
                service.save()?;
                Ok(service)
            }
        }
    }

    fn settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("roomctl");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &PathBuf) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.bulb_name, "Hue color lamp");
        assert_eq!(settings.update_interval_ms, 500);
        assert_eq!(settings.activation_threshold, 0.3);
        assert_eq!(settings.release_threshold, 0.6);
        assert!(settings.log_settings.console_logging_enabled);
    }
}
