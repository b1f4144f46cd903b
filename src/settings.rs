//! Game settings and preferences
//!
//! Persisted as a small JSON file; a missing or corrupt file degrades to
//! defaults instead of failing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sound preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    /// Music volume (0.0 - 1.0)
    pub music: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx: f32,
    pub muted: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            music: 0.25,
            sfx: 0.5,
            muted: false,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub sound: SoundSettings,
}

impl Settings {
    /// Effective sfx volume, zero while muted
    pub fn effective_sfx(&self) -> f32 {
        if self.sound.muted { 0.0 } else { self.sound.sfx }
    }

    /// Effective music volume, zero while muted
    pub fn effective_music(&self) -> f32 {
        if self.sound.muted { 0.0 } else { self.sound.music }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings file ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged, never fatal
    pub fn save(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Failed to save settings: {e}");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
