//! hidscript Input Tracker
//!
//! Turns raw keyboard and pointer notifications into a canonical,
//! delay-annotated timeline. Capture sources are pluggable backends:
//!
//! - **Mice:** `/dev/input/mice` pointer packets (Linux, needs read access)
//! - **Scripted:** replays a JSONL file of raw events
//! - **Stub:** produces nothing
//!
//! The tracker loop feeds backend output into a [`recorder::SharedRecorder`]
//! until it is stopped, the backend runs dry, or a stop hotkey fires.

pub mod backends;
pub mod modifiers;
pub mod raw;
pub mod recorder;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hidscript_common::error::HidscriptResult;
use hidscript_recording_model::timeline::Timeline;

pub use raw::{RawEventKind, RawInputEvent};
pub use recorder::{RecordOutcome, RecorderState, SharedRecorder, TimelineRecorder};

/// Trait for input capture backends.
pub trait InputBackend: Send {
    /// Poll for the next raw event. Returns `None` if none is available.
    fn poll(&mut self) -> HidscriptResult<Option<RawInputEvent>>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend is available on this system.
    fn is_available(&self) -> bool;

    /// Whether the backend will never produce another event.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Current time in the backend's capture clock.
    fn now_ms(&self) -> u64;
}

/// Why the tracker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was raised from outside.
    Requested,
    /// The recorder stopped itself (stop hotkey).
    Hotkey,
    /// The backend has no more events.
    Exhausted,
}

/// Result of one tracker run.
#[derive(Debug)]
pub struct TrackerReport {
    pub backend: String,
    pub events_forwarded: u64,
    pub events_appended: u64,
    pub reason: StopReason,
    pub timeline: Option<Timeline>,
}

/// Coordinates a capture backend with a timeline recorder.
pub struct InputTracker {
    backend: Box<dyn InputBackend>,
    recorder: SharedRecorder,
    stop_flag: Arc<AtomicBool>,
    events_forwarded: u64,
    events_appended: u64,
}

impl InputTracker {
    /// Create a new input tracker.
    pub fn new(backend: Box<dyn InputBackend>, recorder: SharedRecorder) -> Self {
        Self {
            backend,
            recorder,
            stop_flag: Arc::new(AtomicBool::new(false)),
            events_forwarded: 0,
            events_appended: 0,
        }
    }

    /// Start recording and run the tracking loop until it ends.
    pub async fn run(&mut self) -> HidscriptResult<TrackerReport> {
        self.recorder.start_at(self.backend.now_ms())?;
        tracing::info!(backend = %self.backend.name(), "Input tracker started");

        let reason = loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break StopReason::Requested;
            }
            if self.recorder.state() == RecorderState::Stopped {
                break StopReason::Hotkey;
            }

            match self.backend.poll() {
                Ok(Some(event)) => {
                    self.events_forwarded += 1;
                    if self.recorder.record(event) == RecordOutcome::Appended {
                        self.events_appended += 1;
                    }
                }
                Ok(None) if self.backend.is_exhausted() => break StopReason::Exhausted,
                Ok(None) => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Input tracking error");
                }
            }
        };

        self.recorder.stop_at(self.backend.now_ms());
        tracing::info!(
            forwarded = self.events_forwarded,
            appended = self.events_appended,
            reason = ?reason,
            "Input tracker stopped"
        );

        Ok(TrackerReport {
            backend: self.backend.name().to_string(),
            events_forwarded: self.events_forwarded,
            events_appended: self.events_appended,
            reason,
            timeline: self.recorder.take_timeline(),
        })
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Handle to the recorder this tracker feeds.
    pub fn recorder(&self) -> &SharedRecorder {
        &self.recorder
    }

    /// Number of raw events forwarded so far.
    pub fn events_forwarded(&self) -> u64 {
        self.events_forwarded
    }
}
