//! Game settings
//!
//! Read from a JSON file at start-up. Every field has a default, so a
//! partial file (or no file at all) is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{TARGET_FPS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::{Arena, PickupRespawn};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window (and viewport) size in pixels
    pub window_width: u32,
    pub window_height: u32,
    /// Frame limiter target
    pub target_fps: u32,
    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Directory holding the sprite images
    pub asset_dir: PathBuf,
    /// Whether a collected gun pickup comes back during the same run
    pub pickup_respawn: PickupRespawn,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Outline collision rectangles (debug)
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: VIEWPORT_WIDTH as u32,
            window_height: VIEWPORT_HEIGHT as u32,
            target_fps: TARGET_FPS,
            seed: None,
            asset_dir: PathBuf::from("assets"),
            pickup_respawn: PickupRespawn::OneShot,
            show_fps: false,
            show_hitboxes: false,
        }
    }
}

impl Settings {
    /// Default settings file name, looked up in the working directory
    pub const FILE_NAME: &'static str = "rush_hour.json";
    /// Environment variable overriding the settings path
    pub const PATH_ENV: &'static str = "RUSH_HOUR_SETTINGS";

    /// Where settings are read from
    pub fn path() -> PathBuf {
        std::env::var_os(Self::PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::FILE_NAME))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings from JSON, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Write settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Replace zero sizes and frame rates with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.window_width == 0 {
            self.window_width = defaults.window_width;
        }
        if self.window_height == 0 {
            self.window_height = defaults.window_height;
        }
        if self.target_fps == 0 {
            self.target_fps = defaults.target_fps;
        }
        self
    }

    /// Play field matching the window size
    pub fn arena(&self) -> Arena {
        Arena::new(self.window_width as f32, self.window_height as f32)
    }
}
