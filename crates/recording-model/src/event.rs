//! Canonical timeline events.
//!
//! The recorder turns raw capture notifications into these events. Each
//! one carries the milliseconds elapsed since the recording started and,
//! once the timeline is frozen, the delay since the previous event.

use serde::{Deserialize, Serialize};

use crate::key::LogicalKey;

/// Milliseconds since recording start.
pub type ElapsedMs = u64;

/// A single canonical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Milliseconds since recording start.
    #[serde(rename = "t")]
    pub elapsed_ms: ElapsedMs,

    /// Milliseconds since the previous event (filled in at finalize).
    #[serde(rename = "delay", default)]
    pub delay_ms: u64,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of canonical event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Session start marker; always the first event, at elapsed 0.
    Start {
        /// Wall-clock start time (RFC 3339).
        wall_clock: String,
        screen_width: u32,
        screen_height: u32,
    },

    /// Session stop marker; always the last event.
    Stop {
        /// Total elapsed time of the session.
        duration_ms: u64,
    },

    /// Recording paused; raw input is discarded until resume.
    Pause,

    /// Recording resumed.
    Resume,

    /// Keyboard key transition.
    Key {
        /// Resolved logical key.
        key: LogicalKey,
        /// Press or release.
        state: ButtonState,
    },

    /// Pointer button transition.
    Button {
        button: MouseButton,
        state: ButtonState,
        /// Pointer position in physical pixels.
        x: i32,
        y: i32,
        /// Pointer position normalized to the capture screen.
        norm_x: f64,
        norm_y: f64,
    },

    /// Accepted pointer move.
    Move {
        /// New absolute position in physical pixels.
        x: i32,
        y: i32,
        /// Displacement from the previous known position.
        dx: i32,
        dy: i32,
        norm_x: f64,
        norm_y: f64,
    },

    /// Scroll wheel tick.
    Scroll {
        x: i32,
        y: i32,
        /// Horizontal scroll delta.
        dx: f64,
        /// Vertical scroll delta.
        dy: f64,
    },
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

/// Button/key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    Down,
    Up,
}

impl CanonicalEvent {
    /// Create an event whose delay is not yet known.
    pub fn new(elapsed_ms: ElapsedMs, kind: EventKind) -> Self {
        Self {
            elapsed_ms,
            delay_ms: 0,
            kind,
        }
    }

    /// Elapsed time as fractional seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1_000.0
    }
}

impl EventKind {
    /// Whether this is a session control marker rather than input.
    pub fn is_control_marker(&self) -> bool {
        matches!(
            self,
            Self::Start { .. } | Self::Stop { .. } | Self::Pause | Self::Resume
        )
    }

    /// Short type label, matching the serialized `type` tag.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Stop { .. } => "stop",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Key {
                state: ButtonState::Down,
                ..
            } => "key_down",
            Self::Key {
                state: ButtonState::Up,
                ..
            } => "key_up",
            Self::Button {
                state: ButtonState::Down,
                ..
            } => "button_down",
            Self::Button {
                state: ButtonState::Up,
                ..
            } => "button_up",
            Self::Move { .. } => "move",
            Self::Scroll { .. } => "scroll",
        }
    }
}

/// Normalize a pixel coordinate against a screen dimension.
pub fn normalize(value: i32, extent: u32) -> f64 {
    if extent == 0 {
        0.0
    } else {
        value as f64 / extent as f64
    }
}
