//! Customizable keybindings for labeling.
//!
//! The terminal front end reads one token per line and maps it to a
//! [`KeyCode`]; the bindings then turn the key into an [`Action`].

use serde::{Deserialize, Serialize};

use crate::model::{Category, LabelAction};

/// Keys the front end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Backspace,
}

impl KeyCode {
    /// Every key, in display order.
    pub const ALL: [KeyCode; 43] = [
        KeyCode::A,
        KeyCode::B,
        KeyCode::C,
        KeyCode::D,
        KeyCode::E,
        KeyCode::F,
        KeyCode::G,
        KeyCode::H,
        KeyCode::I,
        KeyCode::J,
        KeyCode::K,
        KeyCode::L,
        KeyCode::M,
        KeyCode::N,
        KeyCode::O,
        KeyCode::P,
        KeyCode::Q,
        KeyCode::R,
        KeyCode::S,
        KeyCode::T,
        KeyCode::U,
        KeyCode::V,
        KeyCode::W,
        KeyCode::X,
        KeyCode::Y,
        KeyCode::Z,
        KeyCode::Key0,
        KeyCode::Key1,
        KeyCode::Key2,
        KeyCode::Key3,
        KeyCode::Key4,
        KeyCode::Key5,
        KeyCode::Key6,
        KeyCode::Key7,
        KeyCode::Key8,
        KeyCode::Key9,
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Space,
        KeyCode::Enter,
        KeyCode::Backspace,
    ];

    /// Parse a typed token such as `1`, `e`, `left` or `space`.
    ///
    /// An empty line counts as Space so that pressing Enter advances.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            "" => return Some(KeyCode::Space),
            "←" | "<" => return Some(KeyCode::Left),
            "→" | ">" => return Some(KeyCode::Right),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|key| key_to_string(*key).eq_ignore_ascii_case(token))
    }
}

/// What a key press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Label or discard the current stop
    Label(LabelAction),
    /// Go to the next stop
    Next,
    /// Go to the previous stop
    Previous,
    /// Export the labels
    Export,
    /// Leave the session
    Quit,
}

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Hotkey for the garbage category
    pub label_garbage: KeyCode,
    /// Hotkey for the normal category
    pub label_normal: KeyCode,
    /// Hotkey for the atypical category
    pub label_atypical: KeyCode,
    /// Hotkey for removing the label
    pub discard: KeyCode,

    /// Hotkeys for going back
    pub previous: Vec<KeyCode>,
    /// Hotkeys for going forward
    pub next: Vec<KeyCode>,

    /// Hotkey for export
    pub export: KeyCode,
    /// Hotkey for quitting
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            label_garbage: KeyCode::Key1,
            label_normal: KeyCode::Key2,
            label_atypical: KeyCode::Key3,
            discard: KeyCode::Key4,
            previous: vec![KeyCode::Left],
            next: vec![KeyCode::Right, KeyCode::Space],
            export: KeyCode::E,
            quit: KeyCode::Q,
        }
    }
}

impl KeyBindings {
    /// Get the hotkey for a label action.
    pub fn key_for_label(&self, action: LabelAction) -> KeyCode {
        match action {
            LabelAction::Label(Category::Garbage) => self.label_garbage,
            LabelAction::Label(Category::Normal) => self.label_normal,
            LabelAction::Label(Category::Atypical) => self.label_atypical,
            LabelAction::Discard => self.discard,
        }
    }

    /// Get the action that corresponds to a key press, if any.
    ///
    /// Label keys are checked first, then navigation.
    pub fn action_for_key(&self, key: KeyCode) -> Option<Action> {
        if let Some(action) = LabelAction::ALL
            .into_iter()
            .find(|action| self.key_for_label(*action) == key)
        {
            return Some(Action::Label(action));
        }

        if self.previous.contains(&key) {
            Some(Action::Previous)
        } else if self.next.contains(&key) {
            Some(Action::Next)
        } else if key == self.export {
            Some(Action::Export)
        } else if key == self.quit {
            Some(Action::Quit)
        } else {
            None
        }
    }

    /// Every binding with a description, in display order.
    fn bindings(&self) -> Vec<(KeyCode, String)> {
        let mut all: Vec<(KeyCode, String)> = LabelAction::ALL
            .into_iter()
            .map(|action| (self.key_for_label(action), format!("Label {}", action.name())))
            .collect();
        all.extend(self.previous.iter().map(|k| (*k, "Previous".to_string())));
        all.extend(self.next.iter().map(|k| (*k, "Next".to_string())));
        all.push((self.export, "Export".to_string()));
        all.push((self.quit, "Quit".to_string()));
        all
    }

    /// Check if a key is bound more than once.
    /// Returns descriptions of everything it is bound to, if it is.
    pub fn key_conflict(&self, key: KeyCode) -> Option<Vec<String>> {
        let uses: Vec<String> = self
            .bindings()
            .into_iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, what)| what)
            .collect();
        (uses.len() > 1).then_some(uses)
    }

    /// All keys that are bound more than once.
    pub fn conflicts(&self) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = Vec::new();
        for (key, _) in self.bindings() {
            if !keys.contains(&key) && self.key_conflict(key).is_some() {
                keys.push(key);
            }
        }
        keys
    }

    /// One-line help text, e.g. `1 garbage | 2 normal | ...`.
    pub fn help_line(&self) -> String {
        let keys = |list: &[KeyCode]| {
            list.iter()
                .map(|k| key_to_string(*k))
                .collect::<Vec<_>>()
                .join("/")
        };

        let mut parts: Vec<String> = LabelAction::ALL
            .into_iter()
            .map(|action| {
                format!(
                    "{} {}",
                    key_to_string(self.key_for_label(action)),
                    action.name()
                )
            })
            .collect();
        parts.push(format!("{} previous", keys(&self.previous)));
        parts.push(format!("{} next", keys(&self.next)));
        parts.push(format!("{} export", key_to_string(self.export)));
        parts.push(format!("{} quit", key_to_string(self.quit)));
        parts.join(" | ")
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> &'static str {
    match key {
        KeyCode::A => "A",
        KeyCode::B => "B",
        KeyCode::C => "C",
        KeyCode::D => "D",
        KeyCode::E => "E",
        KeyCode::F => "F",
        KeyCode::G => "G",
        KeyCode::H => "H",
        KeyCode::I => "I",
        KeyCode::J => "J",
        KeyCode::K => "K",
        KeyCode::L => "L",
        KeyCode::M => "M",
        KeyCode::N => "N",
        KeyCode::O => "O",
        KeyCode::P => "P",
        KeyCode::Q => "Q",
        KeyCode::R => "R",
        KeyCode::S => "S",
        KeyCode::T => "T",
        KeyCode::U => "U",
        KeyCode::V => "V",
        KeyCode::W => "W",
        KeyCode::X => "X",
        KeyCode::Y => "Y",
        KeyCode::Z => "Z",
        KeyCode::Key0 => "0",
        KeyCode::Key1 => "1",
        KeyCode::Key2 => "2",
        KeyCode::Key3 => "3",
        KeyCode::Key4 => "4",
        KeyCode::Key5 => "5",
        KeyCode::Key6 => "6",
        KeyCode::Key7 => "7",
        KeyCode::Key8 => "8",
        KeyCode::Key9 => "9",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Space => "Space",
        KeyCode::Enter => "Enter",
        KeyCode::Backspace => "Backspace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.action_for_key(KeyCode::Key1),
            Some(Action::Label(Category::Garbage.into()))
        );
        assert_eq!(
            bindings.action_for_key(KeyCode::Key2),
            Some(Action::Label(Category::Normal.into()))
        );
        assert_eq!(
            bindings.action_for_key(KeyCode::Key3),
            Some(Action::Label(Category::Atypical.into()))
        );
        assert_eq!(
            bindings.action_for_key(KeyCode::Key4),
            Some(Action::Label(LabelAction::Discard))
        );
        assert_eq!(bindings.action_for_key(KeyCode::Left), Some(Action::Previous));
        assert_eq!(bindings.action_for_key(KeyCode::Right), Some(Action::Next));
        assert_eq!(bindings.action_for_key(KeyCode::Space), Some(Action::Next));
        assert_eq!(bindings.action_for_key(KeyCode::E), Some(Action::Export));
        assert_eq!(bindings.action_for_key(KeyCode::Q), Some(Action::Quit));
        assert_eq!(bindings.action_for_key(KeyCode::Z), None);
        assert!(bindings.conflicts().is_empty());
    }

    #[test]
    fn test_from_token() {
        assert_eq!(KeyCode::from_token("1"), Some(KeyCode::Key1));
        assert_eq!(KeyCode::from_token("e"), Some(KeyCode::E));
        assert_eq!(KeyCode::from_token("LEFT"), Some(KeyCode::Left));
        assert_eq!(KeyCode::from_token("right\n"), Some(KeyCode::Right));
        assert_eq!(KeyCode::from_token(""), Some(KeyCode::Space));
        assert_eq!(KeyCode::from_token("space"), Some(KeyCode::Space));
        assert_eq!(KeyCode::from_token("<"), Some(KeyCode::Left));
        assert_eq!(KeyCode::from_token("nope"), None);
    }

    #[test]
    fn test_key_conflict() {
        let mut bindings = KeyBindings::default();
        assert_eq!(bindings.key_conflict(KeyCode::Key1), None);

        bindings.export = KeyCode::Key1;
        assert_eq!(
            bindings.key_conflict(KeyCode::Key1),
            Some(vec!["Label garbage".to_string(), "Export".to_string()])
        );
        assert_eq!(bindings.conflicts(), vec![KeyCode::Key1]);
        // Label keys win
        assert_eq!(
            bindings.action_for_key(KeyCode::Key1),
            Some(Action::Label(Category::Garbage.into()))
        );
    }

    #[test]
    fn test_help_line() {
        let help = KeyBindings::default().help_line();
        assert!(help.starts_with("1 garbage | 2 normal | 3 atypical | 4 discard"));
        assert!(help.contains("Right/Space next"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&KeyCode::Key1).unwrap();
        assert_eq!(json, "\"Key1\"");
        let bindings: KeyBindings =
            serde_json::from_str(&serde_json::to_string(&KeyBindings::default()).unwrap())
                .unwrap();
        assert_eq!(bindings, KeyBindings::default());
    }
}
