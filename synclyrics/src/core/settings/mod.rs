//! Settings Persistence
//!
//! Sync settings stored as JSON with:
//! - Defaults for every missing field
//! - Normalization that clamps bad values instead of failing
//! - Atomic saves
//!
//! Storage location: {config_dir}/synclyrics/settings.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::fs::atomic_write_json_pretty;
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::{CoreResult, TimeSec, DEFAULT_CAPTION_SEC};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

const APP_DIR: &str = "synclyrics";

/// Tunables for a sync session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Number of undo snapshots retained
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Length given to captions without an end time on export
    #[serde(default = "default_caption_sec")]
    pub default_caption_sec: TimeSec,

    /// Step for the left/right seek shortcuts
    #[serde(default = "default_seek_step")]
    pub seek_step_sec: TimeSec,

    /// Step for nudging a caption's start earlier or later
    #[serde(default = "default_nudge_step")]
    pub nudge_step_sec: TimeSec,

    /// How often the interactive session samples the playback clock
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_caption_sec() -> TimeSec {
    DEFAULT_CAPTION_SEC
}

fn default_seek_step() -> TimeSec {
    5.0
}

fn default_nudge_step() -> TimeSec {
    0.1
}

fn default_tick_interval() -> u64 {
    100
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            history_limit: default_history_limit(),
            default_caption_sec: default_caption_sec(),
            seek_step_sec: default_seek_step(),
            nudge_step_sec: default_nudge_step(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl SyncSettings {
    /// Clamps every field into its valid range.
    ///
    /// Corrupt or hand-edited values are corrected rather than rejected.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;
        self.history_limit = self.history_limit.clamp(1, 500);
        self.default_caption_sec =
            clamp_f64(self.default_caption_sec, 0.1, 60.0, default_caption_sec());
        self.seek_step_sec = clamp_f64(self.seek_step_sec, 0.1, 600.0, default_seek_step());
        self.nudge_step_sec = clamp_f64(self.nudge_step_sec, 0.001, 10.0, default_nudge_step());
        self.tick_interval_ms = self.tick_interval_ms.clamp(10, 1000);
    }
}

fn clamp_f64(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}

/// Loads and saves `SyncSettings`
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Settings stored at an explicit path
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Settings stored in the platform config directory.
    ///
    /// Falls back to the working directory when no config dir is known.
    pub fn in_config_dir() -> Self {
        let base = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(SETTINGS_FILE))
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, returning defaults if the file is missing or unreadable
    pub fn load(&self) -> SyncSettings {
        if !self.settings_path.exists() {
            info!("Settings file not found, using defaults");
            return SyncSettings::default();
        }

        let loaded = std::fs::read_to_string(&self.settings_path)
            .map_err(|e| format!("Failed to read settings file: {}", e))
            .and_then(|content| {
                serde_json::from_str::<SyncSettings>(&content)
                    .map_err(|e| format!("Failed to parse settings file: {}", e))
            });

        match loaded {
            Ok(mut settings) => {
                if settings.version < SETTINGS_VERSION {
                    info!(
                        "Migrating settings from version {} to {}",
                        settings.version, SETTINGS_VERSION
                    );
                }
                let before = settings.clone();
                settings.normalize();
                if settings != before && before.version >= SETTINGS_VERSION {
                    warn!("Settings contained out-of-range values and were clamped");
                }
                settings
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                SyncSettings::default()
            }
        }
    }

    /// Normalize and save settings atomically, returning what was written
    pub fn save(&self, settings: &SyncSettings) -> CoreResult<SyncSettings> {
        let mut normalized = settings.clone();
        normalized.normalize();
        atomic_write_json_pretty(&self.settings_path, &normalized)?;
        info!("Settings saved to {:?}", self.settings_path);
        Ok(normalized)
    }

    /// Delete the settings file and return defaults
    pub fn reset(&self) -> CoreResult<SyncSettings> {
        if self.settings_path.exists() {
            std::fs::remove_file(&self.settings_path)?;
            info!("Settings file deleted");
        }
        Ok(SyncSettings::default())
    }
}
