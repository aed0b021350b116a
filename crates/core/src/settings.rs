use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ActionKind;

/// Shortest refresh interval honored; capture latency dominates below this.
pub const MIN_REFRESH_MS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub delay_enabled: bool,
    pub refresh_interval_ms: u64,
    pub log_path: PathBuf,
    pub screenshot_path: PathBuf,
    pub hotkey_action: ActionKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_enabled: true,
            refresh_interval_ms: 100,
            log_path: PathBuf::from("mouseInfoLog.txt"),
            screenshot_path: PathBuf::from("mouseInfoScreenshot.png"),
            hotkey_action: ActionKind::LogAll,
        }
    }
}

impl Settings {
    /// Missing or malformed files yield the defaults.
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(MIN_REFRESH_MS))
    }

    /// Anchor relative output paths at `dir`.
    pub fn resolve_paths(&mut self, dir: &Path) {
        if self.log_path.is_relative() {
            self.log_path = dir.join(&self.log_path);
        }
        if self.screenshot_path.is_relative() {
            self.screenshot_path = dir.join(&self.screenshot_path);
        }
    }
}
