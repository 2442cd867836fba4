//! Device instructions.
//!
//! The compiled form of a timeline. Every instruction carries the pause
//! the device takes before executing it and a payload using
//! device-native identifiers.

use serde::{Deserialize, Serialize};

/// One compiled instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInstruction {
    /// Pause before the instruction, in milliseconds.
    #[serde(rename = "delay")]
    pub delay_ms: u64,

    #[serde(flatten)]
    pub op: DeviceOp,
}

/// Device operation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DeviceOp {
    KeyPress { key: DeviceKey },
    KeyRelease { key: DeviceKey },
    /// Relative pointer move; both components lie in `[-127, 127]`.
    MouseMove { dx: i8, dy: i8 },
    MousePress { button: DeviceButton },
    MouseRelease { button: DeviceButton },
    /// Wheel movement; positive scrolls up.
    MouseScroll { amount: i32 },
}

/// A key the device can press: a named constant or a typed character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKey {
    Constant(String),
    Literal(char),
}

/// Device mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceButton {
    Left,
    Right,
    Middle,
}

impl DeviceButton {
    /// The library constant naming this button.
    pub fn constant(self) -> &'static str {
        match self {
            Self::Left => "MOUSE_LEFT",
            Self::Right => "MOUSE_RIGHT",
            Self::Middle => "MOUSE_MIDDLE",
        }
    }

    pub const ALL: [DeviceButton; 3] = [Self::Left, Self::Right, Self::Middle];
}

impl DeviceInstruction {
    pub fn new(delay_ms: u64, op: DeviceOp) -> Self {
        Self { delay_ms, op }
    }

    pub fn key_press(delay_ms: u64, key: DeviceKey) -> Self {
        Self::new(delay_ms, DeviceOp::KeyPress { key })
    }

    pub fn key_release(delay_ms: u64, key: DeviceKey) -> Self {
        Self::new(delay_ms, DeviceOp::KeyRelease { key })
    }

    pub fn mouse_move(delay_ms: u64, dx: i8, dy: i8) -> Self {
        Self::new(delay_ms, DeviceOp::MouseMove { dx, dy })
    }

    pub fn mouse_press(delay_ms: u64, button: DeviceButton) -> Self {
        Self::new(delay_ms, DeviceOp::MousePress { button })
    }

    pub fn mouse_release(delay_ms: u64, button: DeviceButton) -> Self {
        Self::new(delay_ms, DeviceOp::MouseRelease { button })
    }

    pub fn mouse_scroll(delay_ms: u64, amount: i32) -> Self {
        Self::new(delay_ms, DeviceOp::MouseScroll { amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_json_shape() {
        let instruction = DeviceInstruction::key_press(100, DeviceKey::Literal('a'));
        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"delay": 100, "op": "key_press", "key": {"literal": "a"}})
        );

        let moved = DeviceInstruction::mouse_move(0, -127, 46);
        let json = serde_json::to_value(&moved).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"delay": 0, "op": "mouse_move", "dx": -127, "dy": 46})
        );
    }

    #[test]
    fn test_instruction_parses_back() {
        let json = r#"{"delay":5,"op":"mouse_press","button":"right"}"#;
        let parsed: DeviceInstruction = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, DeviceInstruction::mouse_press(5, DeviceButton::Right));
    }

    #[test]
    fn test_button_constants() {
        let constants: Vec<&str> = DeviceButton::ALL.iter().map(|b| b.constant()).collect();
        assert_eq!(constants, vec!["MOUSE_LEFT", "MOUSE_RIGHT", "MOUSE_MIDDLE"]);
    }
}
