//! Keycode table: logical keys to device key constants and literals.
//!
//! Named keys map to the constants defined by the Arduino `Keyboard.h`
//! library. Printable ASCII characters (and SPACE, which has no constant)
//! are typed as character literals instead.
//!
//! Single characters outside printable ASCII (`é`, `€`) are unmappable even
//! though they are one character long. `Keyboard.write` takes one byte and
//! the library's layout table only covers ASCII, so such a literal would
//! type a different key or nothing at all.

use hidscript_recording_model::event::MouseButton;
use hidscript_recording_model::key::LogicalKey;

use crate::instruction::{DeviceButton, DeviceKey};

static KEY_CONSTANTS: &[(LogicalKey, &str)] = &[
    // control keys
    (LogicalKey::Esc, "KEY_ESC"),
    (LogicalKey::Enter, "KEY_RETURN"),
    (LogicalKey::Tab, "KEY_TAB"),
    (LogicalKey::Backspace, "KEY_BACKSPACE"),
    (LogicalKey::Delete, "KEY_DELETE"),
    // modifiers
    (LogicalKey::ShiftLeft, "KEY_LEFT_SHIFT"),
    (LogicalKey::ShiftRight, "KEY_RIGHT_SHIFT"),
    (LogicalKey::CtrlLeft, "KEY_LEFT_CTRL"),
    (LogicalKey::CtrlRight, "KEY_RIGHT_CTRL"),
    (LogicalKey::AltLeft, "KEY_LEFT_ALT"),
    (LogicalKey::AltRight, "KEY_RIGHT_ALT"),
    (LogicalKey::GuiLeft, "KEY_LEFT_GUI"),
    (LogicalKey::GuiRight, "KEY_RIGHT_GUI"),
    // arrows
    (LogicalKey::UpArrow, "KEY_UP_ARROW"),
    (LogicalKey::DownArrow, "KEY_DOWN_ARROW"),
    (LogicalKey::LeftArrow, "KEY_LEFT_ARROW"),
    (LogicalKey::RightArrow, "KEY_RIGHT_ARROW"),
    // function keys
    (LogicalKey::F(1), "KEY_F1"),
    (LogicalKey::F(2), "KEY_F2"),
    (LogicalKey::F(3), "KEY_F3"),
    (LogicalKey::F(4), "KEY_F4"),
    (LogicalKey::F(5), "KEY_F5"),
    (LogicalKey::F(6), "KEY_F6"),
    (LogicalKey::F(7), "KEY_F7"),
    (LogicalKey::F(8), "KEY_F8"),
    (LogicalKey::F(9), "KEY_F9"),
    (LogicalKey::F(10), "KEY_F10"),
    (LogicalKey::F(11), "KEY_F11"),
    (LogicalKey::F(12), "KEY_F12"),
    // navigation
    (LogicalKey::Home, "KEY_HOME"),
    (LogicalKey::End, "KEY_END"),
    (LogicalKey::PageUp, "KEY_PAGE_UP"),
    (LogicalKey::PageDown, "KEY_PAGE_DOWN"),
    (LogicalKey::Insert, "KEY_INSERT"),
    // locks and system
    (LogicalKey::CapsLock, "KEY_CAPS_LOCK"),
    (LogicalKey::NumLock, "KEY_NUM_LOCK"),
    (LogicalKey::ScrollLock, "KEY_SCROLL_LOCK"),
    (LogicalKey::PrintScreen, "KEY_PRINT_SCREEN"),
    (LogicalKey::Pause, "KEY_PAUSE"),
    (LogicalKey::Menu, "KEY_MENU"),
];

/// Device constant for a named key.
pub fn device_constant(key: &LogicalKey) -> Option<&'static str> {
    KEY_CONSTANTS
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, constant)| *constant)
}

/// Logical key for a device constant.
pub fn logical_key(constant: &str) -> Option<LogicalKey> {
    KEY_CONSTANTS
        .iter()
        .find(|(_, c)| *c == constant)
        .map(|(key, _)| key.clone())
}

/// Resolve a logical key to what the device can type: a constant first,
/// then a printable ASCII literal. `None` means the key is unmappable.
pub fn resolve_key(key: &LogicalKey) -> Option<DeviceKey> {
    if let Some(constant) = device_constant(key) {
        return Some(DeviceKey::Constant(constant.to_string()));
    }
    key.literal()
        .filter(|c| matches!(c, ' '..='~'))
        .map(DeviceKey::Literal)
}

/// Device button for a recorded button. Buttons without a device
/// constant fall back to the primary button; the flag reports that.
pub fn device_button(button: MouseButton) -> (DeviceButton, bool) {
    match button {
        MouseButton::Left => (DeviceButton::Left, false),
        MouseButton::Right => (DeviceButton::Right, false),
        MouseButton::Middle => (DeviceButton::Middle, false),
        MouseButton::Back | MouseButton::Forward => (DeviceButton::Left, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_map_to_constants() {
        assert_eq!(device_constant(&LogicalKey::Esc), Some("KEY_ESC"));
        assert_eq!(device_constant(&LogicalKey::Enter), Some("KEY_RETURN"));
        assert_eq!(device_constant(&LogicalKey::ShiftLeft), Some("KEY_LEFT_SHIFT"));
        assert_eq!(device_constant(&LogicalKey::GuiRight), Some("KEY_RIGHT_GUI"));
        assert_eq!(device_constant(&LogicalKey::F(12)), Some("KEY_F12"));
        assert_eq!(device_constant(&LogicalKey::F(13)), None);
    }

    #[test]
    fn test_table_is_bidirectional() {
        for (key, constant) in KEY_CONSTANTS {
            assert_eq!(device_constant(key), Some(*constant));
            assert_eq!(logical_key(constant).as_ref(), Some(key));
        }
        assert_eq!(logical_key("KEY_SPACE"), None);
    }

    #[test]
    fn test_characters_become_literals() {
        assert_eq!(
            resolve_key(&LogicalKey::Char('a')),
            Some(DeviceKey::Literal('a'))
        );
        assert_eq!(
            resolve_key(&LogicalKey::Char('"')),
            Some(DeviceKey::Literal('"'))
        );
        assert_eq!(resolve_key(&LogicalKey::Space), Some(DeviceKey::Literal(' ')));
    }

    #[test]
    fn test_unmappable_keys() {
        assert_eq!(resolve_key(&LogicalKey::Char('é')), None);
        assert_eq!(resolve_key(&LogicalKey::KeyCode(179)), None);
        assert_eq!(resolve_key(&LogicalKey::Other("MEDIA_PLAY".into())), None);
        assert_eq!(resolve_key(&LogicalKey::F(20)), None);
    }

    #[test]
    fn test_unknown_buttons_fall_back_to_primary() {
        assert_eq!(device_button(MouseButton::Right), (DeviceButton::Right, false));
        assert_eq!(device_button(MouseButton::Back), (DeviceButton::Left, true));
    }
}
