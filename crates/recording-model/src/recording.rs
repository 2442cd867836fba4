//! Persisted recordings.
//!
//! A recording file is a single JSON document holding session metadata
//! and the frozen timeline:
//!
//! ```json
//! { "metadata": { "created": "...", "total_events": 5, ... },
//!   "events": [ { "t": 0, "delay": 0, "type": "start", ... }, ... ] }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::event::EventKind;
use crate::timeline::Timeline;

/// Current recording file format version.
pub const FORMAT_VERSION: &str = "1.2";

/// Default device target recorded in metadata.
pub const DEFAULT_TARGET: &str = "Leonardo ATmega32u4";

/// Session metadata stored next to the events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Creation timestamp (RFC 3339).
    pub created: String,

    /// Number of events in the timeline.
    pub total_events: usize,

    /// Elapsed time of the last event.
    pub duration_ms: u64,

    /// Capture screen dimensions in physical pixels.
    pub screen_width: u32,
    pub screen_height: u32,

    /// File format version.
    #[serde(default = "default_format_version")]
    pub format_version: String,

    /// Device the recording is meant for.
    #[serde(default = "default_target")]
    pub target: String,

    /// Operating system the recording was captured on.
    #[serde(default)]
    pub platform: String,
}

/// A recording as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub metadata: SessionMetadata,

    #[serde(rename = "events")]
    pub timeline: Timeline,
}

/// Errors that can occur when loading or saving recordings.
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid recording: {message}")]
    ValidationError { message: String },
}

fn default_format_version() -> String {
    FORMAT_VERSION.to_string()
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl Recording {
    /// Wrap a frozen timeline with freshly generated metadata.
    ///
    /// Screen dimensions are taken from the timeline's start marker when
    /// present, otherwise from the given fallback.
    pub fn from_timeline(timeline: Timeline, fallback_screen: (u32, u32)) -> Self {
        let (screen_width, screen_height) = timeline
            .events()
            .first()
            .and_then(|e| match &e.kind {
                EventKind::Start {
                    screen_width,
                    screen_height,
                    ..
                } => Some((*screen_width, *screen_height)),
                _ => None,
            })
            .unwrap_or(fallback_screen);

        let metadata = SessionMetadata {
            created: chrono::Utc::now().to_rfc3339(),
            total_events: timeline.len(),
            duration_ms: timeline.duration_ms(),
            screen_width,
            screen_height,
            format_version: default_format_version(),
            target: default_target(),
            platform: std::env::consts::OS.to_string(),
        };

        Self { metadata, timeline }
    }

    /// Load a recording from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| RecordingError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let recording: Recording =
            serde_json::from_str(&json).map_err(|e| RecordingError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        recording.validate()?;
        Ok(recording)
    }

    /// Save the recording as pretty-printed JSON.
    ///
    /// The document is written to a sibling temp file and renamed into
    /// place, so an interrupted write never leaves a truncated recording.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordingError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| RecordingError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| RecordingError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        write_atomically(path, json.as_bytes())
    }

    /// Check metadata against the timeline it describes.
    pub fn validate(&self) -> Result<(), RecordingError> {
        if self.metadata.total_events != self.timeline.len() {
            return Err(RecordingError::ValidationError {
                message: format!(
                    "metadata lists {} events but the timeline holds {}",
                    self.metadata.total_events,
                    self.timeline.len()
                ),
            });
        }
        Ok(())
    }
}

/// Write `contents` to `path` through a temporary sibling file.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), RecordingError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents).map_err(|e| RecordingError::IoError {
        path: tmp_path.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        RecordingError::IoError {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
