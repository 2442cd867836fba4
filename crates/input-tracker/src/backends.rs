//! Input capture backend implementations.
//!
//! Each backend provides a different way to obtain raw input events.

use std::path::Path;

use hidscript_common::clock::RecordingClock;
use hidscript_common::config::RecorderSettings;
use hidscript_common::error::{HidscriptError, HidscriptResult};

use crate::raw::{parse_raw_events, RawInputEvent};
use crate::InputBackend;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod non_linux;

#[cfg(target_os = "linux")]
pub use linux::{detect_best_backend, MiceBackend};
#[cfg(not(target_os = "linux"))]
pub use non_linux::detect_best_backend;

/// Replays a fixed list of raw events.
///
/// The capture clock follows the script: it reads as the timestamp of the
/// last delivered event, and as `end_ms` once the script is exhausted.
pub struct ScriptedBackend {
    events: Vec<RawInputEvent>,
    index: usize,
    end_ms: Option<u64>,
}

impl ScriptedBackend {
    pub fn new(events: Vec<RawInputEvent>) -> Self {
        Self {
            events,
            index: 0,
            end_ms: None,
        }
    }

    /// Load a script from a JSONL file of raw events.
    pub fn from_file(path: &Path) -> HidscriptResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HidscriptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                HidscriptError::Io(e)
            }
        })?;
        let events = parse_raw_events(&content).map_err(|e| {
            HidscriptError::input_tracking(format!(
                "Invalid raw event script {}: {e}",
                path.display()
            ))
        })?;
        tracing::debug!(path = %path.display(), events = events.len(), "Loaded raw event script");
        Ok(Self::new(events))
    }

    /// Report `end_ms` as the capture time once every event is delivered.
    pub fn with_end_ms(mut self, end_ms: u64) -> Self {
        self.end_ms = Some(end_ms);
        self
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.index
    }
}

impl InputBackend for ScriptedBackend {
    fn poll(&mut self) -> HidscriptResult<Option<RawInputEvent>> {
        match self.events.get(self.index) {
            Some(event) => {
                self.index += 1;
                Ok(Some(event.clone()))
            }
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.events.len()
    }

    fn now_ms(&self) -> u64 {
        let last = self
            .index
            .checked_sub(1)
            .and_then(|i| self.events.get(i))
            .map(|e| e.captured_at_ms)
            .unwrap_or(0);
        match self.end_ms {
            Some(end) if self.is_exhausted() => end.max(last),
            _ => last,
        }
    }
}

/// Backend that never produces events.
pub struct StubBackend {
    clock: RecordingClock,
}

impl StubBackend {
    pub fn new() -> Self {
        let clock = RecordingClock::start();
        tracing::debug!(epoch = clock.epoch_wall(), "Stub backend started");
        Self { clock }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for StubBackend {
    fn poll(&mut self) -> HidscriptResult<Option<RawInputEvent>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// Fallback used by the platform detectors.
pub(crate) fn stub_for(settings: &RecorderSettings) -> Box<dyn InputBackend> {
    tracing::debug!(
        screen_width = settings.screen_width,
        screen_height = settings.screen_height,
        "Falling back to stub backend"
    );
    Box::new(StubBackend::new())
}
