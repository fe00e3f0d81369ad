use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub(crate) version: u32,

    /// Seconds of "get ready" before answers are accepted.
    #[serde(default = "default_lead_in_seconds")]
    pub lead_in_seconds: u32,

    #[serde(default = "default_true")]
    pub remember_login: bool,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_lead_in_seconds() -> u32 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            lead_in_seconds: default_lead_in_seconds(),
            remember_login: true,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::data_dir())
    }

    pub fn load_from(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        if let Ok(contents) = fs::read_to_string(&path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(err) => warn!(target: "settings", "Ignoring malformed {:?}: {}", path, err),
            }
        }
        let default = Settings::default();
        let _ = default.save_to(data_dir);
        default
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::data_dir())
    }

    pub fn save_to(&self, data_dir: &Path) -> Result<(), std::io::Error> {
        fs::create_dir_all(data_dir)?;
        let contents = serde_json::to_string(self)?;
        fs::write(data_dir.join(SETTINGS_FILE), contents)
    }

    /// `QUIZZO_DATA_DIR` when set, else `quizzo` under the platform data directory.
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os("QUIZZO_DATA_DIR").filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("quizzo")
    }

    fn migrate(&mut self) {
        match self.version {
            // version 1 had no lead-in setting and started answering immediately
            0 | 1 => {
                self.version = 2;
            }
            _ => (),
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }
}
