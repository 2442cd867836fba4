//! Logical key identifiers and modifier state.
//!
//! Every layer (capture, recorder, compiler, renderer) names keys with
//! [`LogicalKey`]. Its canonical string form is what gets persisted:
//! printable characters render as themselves, named keys as upper-case
//! identifiers such as `SHIFT_LEFT` or `PAGE_DOWN`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A key as the recorder and compiler understand it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LogicalKey {
    /// A printable character (already shifted, if SHIFT was held).
    Char(char),

    Esc,
    Enter,
    Tab,
    Space,
    Backspace,
    Delete,

    ShiftLeft,
    ShiftRight,
    CtrlLeft,
    CtrlRight,
    AltLeft,
    AltRight,
    GuiLeft,
    GuiRight,

    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,

    /// Function key `F1`..`F24`.
    F(u8),

    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    CapsLock,
    NumLock,
    ScrollLock,
    PrintScreen,
    Pause,
    Menu,

    /// Platform virtual-key code without a symbolic name.
    KeyCode(u32),

    /// Any other named key reported by the capture source.
    Other(String),
}

/// The four modifier classes tracked during a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
    Gui,
}

/// Active modifier flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub gui: bool,
}

const KEYCODE_PREFIX: &str = "KEYCODE_";

/// Named keys and their canonical identifiers. Characters, function keys,
/// key codes and `Other` are handled separately.
static NAMED_KEYS: &[(LogicalKey, &str)] = &[
    (LogicalKey::Esc, "ESC"),
    (LogicalKey::Enter, "ENTER"),
    (LogicalKey::Tab, "TAB"),
    (LogicalKey::Space, "SPACE"),
    (LogicalKey::Backspace, "BACKSPACE"),
    (LogicalKey::Delete, "DELETE"),
    (LogicalKey::ShiftLeft, "SHIFT_LEFT"),
    (LogicalKey::ShiftRight, "SHIFT_RIGHT"),
    (LogicalKey::CtrlLeft, "CTRL_LEFT"),
    (LogicalKey::CtrlRight, "CTRL_RIGHT"),
    (LogicalKey::AltLeft, "ALT_LEFT"),
    (LogicalKey::AltRight, "ALT_RIGHT"),
    (LogicalKey::GuiLeft, "GUI_LEFT"),
    (LogicalKey::GuiRight, "GUI_RIGHT"),
    (LogicalKey::UpArrow, "UP_ARROW"),
    (LogicalKey::DownArrow, "DOWN_ARROW"),
    (LogicalKey::LeftArrow, "LEFT_ARROW"),
    (LogicalKey::RightArrow, "RIGHT_ARROW"),
    (LogicalKey::Home, "HOME"),
    (LogicalKey::End, "END"),
    (LogicalKey::PageUp, "PAGE_UP"),
    (LogicalKey::PageDown, "PAGE_DOWN"),
    (LogicalKey::Insert, "INSERT"),
    (LogicalKey::CapsLock, "CAPS_LOCK"),
    (LogicalKey::NumLock, "NUM_LOCK"),
    (LogicalKey::ScrollLock, "SCROLL_LOCK"),
    (LogicalKey::PrintScreen, "PRINT_SCREEN"),
    (LogicalKey::Pause, "PAUSE"),
    (LogicalKey::Menu, "MENU"),
];

/// Lower-case names used by common hook libraries (`shift_r`, `cmd`,
/// `page_up`, ...). Accepted when parsing raw capture scripts.
static CAPTURE_ALIASES: &[(&str, LogicalKey)] = &[
    ("esc", LogicalKey::Esc),
    ("escape", LogicalKey::Esc),
    ("enter", LogicalKey::Enter),
    ("return", LogicalKey::Enter),
    ("tab", LogicalKey::Tab),
    ("space", LogicalKey::Space),
    ("backspace", LogicalKey::Backspace),
    ("delete", LogicalKey::Delete),
    ("shift", LogicalKey::ShiftLeft),
    ("shift_l", LogicalKey::ShiftLeft),
    ("shift_r", LogicalKey::ShiftRight),
    ("ctrl", LogicalKey::CtrlLeft),
    ("ctrl_l", LogicalKey::CtrlLeft),
    ("ctrl_r", LogicalKey::CtrlRight),
    ("alt", LogicalKey::AltLeft),
    ("alt_l", LogicalKey::AltLeft),
    ("alt_r", LogicalKey::AltRight),
    ("alt_gr", LogicalKey::AltRight),
    ("cmd", LogicalKey::GuiLeft),
    ("cmd_l", LogicalKey::GuiLeft),
    ("cmd_r", LogicalKey::GuiRight),
    ("super", LogicalKey::GuiLeft),
    ("up", LogicalKey::UpArrow),
    ("down", LogicalKey::DownArrow),
    ("left", LogicalKey::LeftArrow),
    ("right", LogicalKey::RightArrow),
    ("home", LogicalKey::Home),
    ("end", LogicalKey::End),
    ("page_up", LogicalKey::PageUp),
    ("page_down", LogicalKey::PageDown),
    ("insert", LogicalKey::Insert),
    ("caps_lock", LogicalKey::CapsLock),
    ("num_lock", LogicalKey::NumLock),
    ("scroll_lock", LogicalKey::ScrollLock),
    ("print_screen", LogicalKey::PrintScreen),
    ("pause", LogicalKey::Pause),
    ("menu", LogicalKey::Menu),
];

impl LogicalKey {
    /// Build a key from a typed character, folding whitespace and control
    /// characters into their named keys.
    pub fn from_char(c: char) -> Self {
        match c {
            '\t' => Self::Tab,
            '\n' | '\r' => Self::Enter,
            ' ' => Self::Space,
            '\x1b' => Self::Esc,
            '\x08' => Self::Backspace,
            '\x7f' => Self::Delete,
            other => Self::Char(other),
        }
    }

    /// Parse a key name. Accepts canonical identifiers, single characters,
    /// `F1`..`F24`, `KEYCODE_<n>` and common hook-library aliases. Anything
    /// else becomes [`LogicalKey::Other`].
    pub fn parse(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_char(c);
        }

        if let Some((key, _)) = NAMED_KEYS.iter().find(|(_, id)| *id == name) {
            return key.clone();
        }

        if let Some(n) = parse_function_key(name) {
            return Self::F(n);
        }

        if let Some(code) = name
            .get(..KEYCODE_PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(KEYCODE_PREFIX))
            .and_then(|_| name[KEYCODE_PREFIX.len()..].parse::<u32>().ok())
        {
            return Self::KeyCode(code);
        }

        let lower = name.to_ascii_lowercase();
        if let Some((_, key)) = CAPTURE_ALIASES.iter().find(|(alias, _)| *alias == lower) {
            return key.clone();
        }

        Self::Other(name.to_ascii_uppercase())
    }

    /// Canonical string form.
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::F(n) => format!("F{n}"),
            Self::KeyCode(code) => format!("{KEYCODE_PREFIX}{code}"),
            Self::Other(name) => name.clone(),
            named => NAMED_KEYS
                .iter()
                .find(|(key, _)| key == named)
                .map(|(_, id)| (*id).to_string())
                .unwrap_or_default(),
        }
    }

    /// The modifier class of this key, if it is a modifier.
    pub fn modifier(&self) -> Option<Modifier> {
        match self {
            Self::ShiftLeft | Self::ShiftRight => Some(Modifier::Shift),
            Self::CtrlLeft | Self::CtrlRight => Some(Modifier::Ctrl),
            Self::AltLeft | Self::AltRight => Some(Modifier::Alt),
            Self::GuiLeft | Self::GuiRight => Some(Modifier::Gui),
            _ => None,
        }
    }

    pub fn is_modifier(&self) -> bool {
        self.modifier().is_some()
    }

    /// The character this key types when written literally.
    pub fn literal(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            Self::Space => Some(' '),
            _ => None,
        }
    }
}

fn parse_function_key(name: &str) -> Option<u8> {
    let digits = name.strip_prefix('F').or_else(|| name.strip_prefix('f'))?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u8>() {
        Ok(n) if (1..=24).contains(&n) => Some(n),
        _ => None,
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl From<LogicalKey> for String {
    fn from(key: LogicalKey) -> Self {
        key.canonical_name()
    }
}

impl From<String> for LogicalKey {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for LogicalKey {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl ModifierState {
    pub fn is_active(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Gui => self.gui,
        }
    }

    pub fn set(&mut self, modifier: Modifier, active: bool) {
        match modifier {
            Modifier::Shift => self.shift = active,
            Modifier::Ctrl => self.ctrl = active,
            Modifier::Alt => self.alt = active,
            Modifier::Gui => self.gui = active,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.gui
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_roundtrip_through_canonical_name() {
        for (key, id) in NAMED_KEYS {
            assert_eq!(key.canonical_name(), *id);
            assert_eq!(LogicalKey::parse(id), *key);
        }
    }

    #[test]
    fn test_single_characters_parse_as_chars() {
        assert_eq!(LogicalKey::parse("a"), LogicalKey::Char('a'));
        assert_eq!(LogicalKey::parse("!"), LogicalKey::Char('!'));
        assert_eq!(LogicalKey::parse("F"), LogicalKey::Char('F'));
    }

    #[test]
    fn test_whitespace_characters_fold_into_named_keys() {
        assert_eq!(LogicalKey::parse("\t"), LogicalKey::Tab);
        assert_eq!(LogicalKey::parse("\r"), LogicalKey::Enter);
        assert_eq!(LogicalKey::parse(" "), LogicalKey::Space);
        assert_eq!(LogicalKey::from_char('\x7f'), LogicalKey::Delete);
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(LogicalKey::parse("F1"), LogicalKey::F(1));
        assert_eq!(LogicalKey::parse("F12"), LogicalKey::F(12));
        assert_eq!(LogicalKey::parse("f5"), LogicalKey::F(5));
        assert_eq!(LogicalKey::F(7).canonical_name(), "F7");
        assert_eq!(LogicalKey::parse("F25"), LogicalKey::Other("F25".into()));
    }

    #[test]
    fn test_capture_aliases() {
        assert_eq!(LogicalKey::parse("shift_r"), LogicalKey::ShiftRight);
        assert_eq!(LogicalKey::parse("cmd"), LogicalKey::GuiLeft);
        assert_eq!(LogicalKey::parse("page_down"), LogicalKey::PageDown);
        assert_eq!(LogicalKey::parse("media_play"), LogicalKey::Other("MEDIA_PLAY".into()));
    }

    #[test]
    fn test_keycode_keys() {
        let key = LogicalKey::parse("KEYCODE_65");
        assert_eq!(key, LogicalKey::KeyCode(65));
        assert_eq!(key.to_string(), "KEYCODE_65");
    }

    #[test]
    fn test_keycode_prefix_ignores_case() {
        let key = LogicalKey::parse("keycode_65");
        assert_eq!(key, LogicalKey::KeyCode(65));
        assert_eq!(LogicalKey::parse(&key.to_string()), key);
        assert_eq!(
            LogicalKey::parse("keycode_x"),
            LogicalKey::Other("KEYCODE_X".to_string())
        );
    }

    #[test]
    fn test_modifier_classification() {
        assert_eq!(LogicalKey::ShiftRight.modifier(), Some(Modifier::Shift));
        assert_eq!(LogicalKey::GuiLeft.modifier(), Some(Modifier::Gui));
        assert_eq!(LogicalKey::Char('a').modifier(), None);
        assert!(!LogicalKey::CapsLock.is_modifier());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let json = serde_json::to_string(&LogicalKey::PageUp).unwrap();
        assert_eq!(json, "\"PAGE_UP\"");
        let parsed: LogicalKey = serde_json::from_str("\"CTRL_LEFT\"").unwrap();
        assert_eq!(parsed, LogicalKey::CtrlLeft);
        let ch: LogicalKey = serde_json::from_str("\"~\"").unwrap();
        assert_eq!(ch, LogicalKey::Char('~'));
    }

    #[test]
    fn test_literals() {
        assert_eq!(LogicalKey::Char('x').literal(), Some('x'));
        assert_eq!(LogicalKey::Space.literal(), Some(' '));
        assert_eq!(LogicalKey::Enter.literal(), None);
    }

    #[test]
    fn test_modifier_state() {
        let mut state = ModifierState::default();
        assert!(!state.any());
        state.set(Modifier::Ctrl, true);
        assert!(state.is_active(Modifier::Ctrl));
        assert!(!state.is_active(Modifier::Shift));
        state.clear();
        assert!(!state.any());
    }
}
