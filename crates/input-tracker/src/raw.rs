//! Raw input notifications as delivered by a capture source.
//!
//! Raw events are ephemeral: the recorder consumes them in capture order
//! and never stores them. Scripted sessions use the same shape in JSONL
//! form, one event per line.

use serde::{Deserialize, Serialize};

use hidscript_recording_model::event::MouseButton;
use hidscript_recording_model::key::LogicalKey;

/// A raw capture notification with its capture timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputEvent {
    /// Monotonic capture time in milliseconds, in the source's own clock.
    #[serde(rename = "t")]
    pub captured_at_ms: u64,

    #[serde(flatten)]
    pub kind: RawEventKind,
}

/// Variant-specific payload of a raw event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEventKind {
    /// Physical key pressed (unshifted key identity).
    KeyDown { key: LogicalKey },

    /// Physical key released.
    KeyUp { key: LogicalKey },

    /// Pointer button pressed at an absolute position.
    PointerDown { button: MouseButton, x: i32, y: i32 },

    /// Pointer button released at an absolute position.
    PointerUp { button: MouseButton, x: i32, y: i32 },

    /// Pointer moved to an absolute position.
    PointerMove { x: i32, y: i32 },

    /// Scroll wheel tick at an absolute position.
    PointerScroll { x: i32, y: i32, dx: f64, dy: f64 },
}

impl RawInputEvent {
    pub fn key_down(captured_at_ms: u64, key: impl Into<LogicalKey>) -> Self {
        Self {
            captured_at_ms,
            kind: RawEventKind::KeyDown { key: key.into() },
        }
    }

    pub fn key_up(captured_at_ms: u64, key: impl Into<LogicalKey>) -> Self {
        Self {
            captured_at_ms,
            kind: RawEventKind::KeyUp { key: key.into() },
        }
    }

    pub fn pointer_down(captured_at_ms: u64, button: MouseButton, x: i32, y: i32) -> Self {
        Self {
            captured_at_ms,
            kind: RawEventKind::PointerDown { button, x, y },
        }
    }

    pub fn pointer_up(captured_at_ms: u64, button: MouseButton, x: i32, y: i32) -> Self {
        Self {
            captured_at_ms,
            kind: RawEventKind::PointerUp { button, x, y },
        }
    }

    pub fn pointer_move(captured_at_ms: u64, x: i32, y: i32) -> Self {
        Self {
            captured_at_ms,
            kind: RawEventKind::PointerMove { x, y },
        }
    }

    pub fn scroll(captured_at_ms: u64, x: i32, y: i32, dx: f64, dy: f64) -> Self {
        Self {
            captured_at_ms,
            kind: RawEventKind::PointerScroll { x, y, dx, dy },
        }
    }
}

/// Parse raw events from JSONL content (one JSON object per line).
/// Blank lines and `#` comment lines are skipped.
pub fn parse_raw_events(jsonl: &str) -> Result<Vec<RawInputEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
