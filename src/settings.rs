//! Game settings and preferences
//!
//! Persisted as JSON next to the high score table. Loading is lenient: a
//! missing or unreadable file yields defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Player preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sound cues on game events
    pub sound: bool,
    /// Master volume (0.0 - 1.0); zero is equivalent to sound off
    pub master_volume: f32,
    /// Show tick timing in the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("corrupt settings file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to `path`. Best-effort, logs on failure.
    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("failed to serialize settings: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(path, json) {
            log::warn!("failed to save settings to {}: {err}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/settings.json"));
        assert!(settings.sound);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn settings_round_trip() {
        let dir = std::env::temp_dir().join("retro-arena-test-settings");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("settings.json");

        let mut settings = Settings::default();
        settings.sound = false;
        settings.show_fps = true;
        settings.save(&path);

        let loaded = Settings::load(&path);
        assert!(!loaded.sound);
        assert!(loaded.show_fps);

        let _ = fs::remove_file(&path);
    }
}
