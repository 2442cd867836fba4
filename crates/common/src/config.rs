//! Application configuration.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::error::{HidscriptError, HidscriptResult};

/// Accepted range for the minimum pointer-move displacement.
pub const MIN_MOVE_PX_RANGE: RangeInclusive<u32> = 1..=50;

/// Accepted range for the pointer-move sampling interval.
pub const MOVE_INTERVAL_MS_RANGE: RangeInclusive<u64> = 10..=1000;

/// Largest relative move a HID mouse report can carry on one axis.
pub const DEVICE_MAX_STEP: i32 = 127;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where recordings are stored.
    pub recordings_dir: PathBuf,

    /// Recorder settings.
    #[serde(default)]
    pub recorder: RecorderSettings,

    /// Instruction compiler settings.
    #[serde(default)]
    pub compiler: CompileSettings,

    /// Program renderer settings.
    #[serde(default)]
    pub render: RenderSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timeline recorder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    /// Whether pointer moves are recorded at all.
    pub record_moves: bool,

    /// Minimum displacement (px, either axis) for a move to be kept.
    min_move_px: u32,

    /// Minimum time between two kept moves.
    move_interval_ms: u64,

    /// Capture screen dimensions, used for normalized positions.
    pub screen_width: u32,
    pub screen_height: u32,

    /// Key that toggles pause while recording (canonical key name).
    pub pause_hotkey: Option<String>,

    /// Key that stops the recording (canonical key name).
    pub stop_hotkey: Option<String>,
}

/// Instruction compiler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSettings {
    /// Largest per-instruction pointer step on one axis.
    pub max_step: i32,

    /// Multiplier from recorded scroll delta to device wheel amount.
    pub scroll_factor: i32,

    /// Delays below this many milliseconds are rewritten to zero.
    pub noise_threshold_ms: u64,
}

/// Device program rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Grace delay in `setup()` before the events replay.
    pub startup_delay_ms: u64,

    /// Board name written into the program header.
    pub target_name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "hidscript=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recordings_dir: dirs_default_recordings(),
            recorder: RecorderSettings::default(),
            compiler: CompileSettings::default(),
            render: RenderSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            record_moves: true,
            min_move_px: 5,
            move_interval_ms: 50,
            screen_width: 1920,
            screen_height: 1080,
            pause_hotkey: Some("F1".to_string()),
            stop_hotkey: Some("ESC".to_string()),
        }
    }
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            max_step: DEVICE_MAX_STEP,
            scroll_factor: 3,
            noise_threshold_ms: 10,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            startup_delay_ms: 3000,
            target_name: "Arduino Leonardo (ATmega32u4)".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl RecorderSettings {
    pub fn min_move_px(&self) -> u32 {
        self.min_move_px
    }

    pub fn move_interval_ms(&self) -> u64 {
        self.move_interval_ms
    }

    /// Set the minimum move displacement. Out-of-range values are
    /// rejected and the previous value is kept.
    pub fn set_min_move_px(&mut self, px: u32) -> HidscriptResult<()> {
        if !MIN_MOVE_PX_RANGE.contains(&px) {
            return Err(HidscriptError::config(format!(
                "min_move_px must be within {}..={}, got {px}",
                MIN_MOVE_PX_RANGE.start(),
                MIN_MOVE_PX_RANGE.end()
            )));
        }
        self.min_move_px = px;
        Ok(())
    }

    /// Set the move sampling interval. Out-of-range values are rejected
    /// and the previous value is kept.
    pub fn set_move_interval_ms(&mut self, ms: u64) -> HidscriptResult<()> {
        if !MOVE_INTERVAL_MS_RANGE.contains(&ms) {
            return Err(HidscriptError::config(format!(
                "move_interval_ms must be within {}..={}, got {ms}",
                MOVE_INTERVAL_MS_RANGE.start(),
                MOVE_INTERVAL_MS_RANGE.end()
            )));
        }
        self.move_interval_ms = ms;
        Ok(())
    }

    /// Check values that may have come from a hand-edited config file.
    pub fn validate(&self) -> HidscriptResult<()> {
        let mut candidate = self.clone();
        candidate.set_min_move_px(self.min_move_px)?;
        candidate.set_move_interval_ms(self.move_interval_ms)?;
        Ok(())
    }
}

impl CompileSettings {
    pub fn validate(&self) -> HidscriptResult<()> {
        if !(1..=DEVICE_MAX_STEP).contains(&self.max_step) {
            return Err(HidscriptError::config(format!(
                "max_step must be within 1..={DEVICE_MAX_STEP}, got {}",
                self.max_step
            )));
        }
        if self.scroll_factor == 0 {
            return Err(HidscriptError::config("scroll_factor must not be zero"));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(config) => match config.validate() {
                        Ok(()) => return config,
                        Err(e) => {
                            tracing::warn!("Invalid config at {:?}: {}", config_path, e);
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> HidscriptResult<()> {
        self.recorder.validate()?;
        self.compiler.validate()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("hidscript").join("config.json")
}

/// Default recordings directory.
fn dirs_default_recordings() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("hidscript").join("recordings")
}
