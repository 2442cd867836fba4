//! Modifier tracking and shifted-key resolution.

use hidscript_recording_model::key::{LogicalKey, ModifierState};

/// Characters produced by SHIFT on a US layout, for non-alphabetic keys.
const SHIFT_TABLE: [(char, char); 21] = [
    ('`', '~'),
    ('1', '!'),
    ('2', '@'),
    ('3', '#'),
    ('4', '$'),
    ('5', '%'),
    ('6', '^'),
    ('7', '&'),
    ('8', '*'),
    ('9', '('),
    ('0', ')'),
    ('-', '_'),
    ('=', '+'),
    ('[', '{'),
    (']', '}'),
    ('\\', '|'),
    (';', ':'),
    ('\'', '"'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
];

/// Resolves physical key transitions into logical keys while tracking
/// which modifiers are held.
#[derive(Debug, Clone, Default)]
pub struct ModifierTracker {
    state: ModifierState,
    /// Modifier keys currently down, in press order.
    held: Vec<LogicalKey>,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key transition.
    ///
    /// Returns `None` when the transition must not be recorded: a second
    /// press of a modifier that is already down, or a release of one that
    /// is not.
    pub fn resolve(&mut self, raw: &LogicalKey, pressed: bool) -> Option<LogicalKey> {
        if let Some(modifier) = raw.modifier() {
            if pressed {
                if self.held.contains(raw) {
                    return None;
                }
                self.held.push(raw.clone());
                self.state.set(modifier, true);
            } else {
                let index = self.held.iter().position(|k| k == raw)?;
                self.held.remove(index);
                let still_held = self.held.iter().any(|k| k.modifier() == Some(modifier));
                self.state.set(modifier, still_held);
            }
            return Some(raw.clone());
        }

        match raw {
            LogicalKey::Char(c) if self.state.shift => Some(LogicalKey::Char(shifted(*c))),
            other => Some(other.clone()),
        }
    }

    /// Current modifier flags.
    pub fn state(&self) -> ModifierState {
        self.state
    }

    /// Release every held modifier, returning them in press order.
    pub fn release_all(&mut self) -> Vec<LogicalKey> {
        self.state.clear();
        std::mem::take(&mut self.held)
    }

    pub fn reset(&mut self) {
        self.state.clear();
        self.held.clear();
    }
}

/// Apply SHIFT to a printable character.
pub fn shifted(c: char) -> char {
    if c.is_alphabetic() {
        let mut upper = c.to_uppercase();
        return match (upper.next(), upper.next()) {
            (Some(u), None) => u,
            _ => c,
        };
    }
    SHIFT_TABLE
        .iter()
        .find(|(plain, _)| *plain == c)
        .map(|(_, shifted)| *shifted)
        .unwrap_or(c)
}
