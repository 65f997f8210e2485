//! Player settings and preferences
//!
//! Persisted separately from the high score, as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Haptic feedback on striker returns and game over
    pub haptics: bool,
    /// Show hint/caution messages
    pub hints: bool,
    /// Drive the striker from device tilt
    pub tilt_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptics: true,
            hints: true,
            tilt_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults if missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
