//! Key bindings: a preset plus user overrides from `[ui.keymap]`.

mod binding;
mod presets;

pub use binding::KeyBinding;
pub use presets::KeymapPreset;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

/// What a key press means, independent of which key produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Home,
    End,
    /// Activate the focused control (Enter)
    Confirm,
    /// Leave the current view or dialog (Esc)
    Cancel,
    Quit,
    NextField,
    PrevField,
    Backspace,
    DeleteChar,
    /// Submit from anywhere on the homework view
    Submit,
    /// Open the file picker from anywhere on the homework view
    Browse,
}

impl Action {
    pub fn description(self) -> &'static str {
        match self {
            Action::MoveUp => "Move up",
            Action::MoveDown => "Move down",
            Action::MoveLeft => "Move left",
            Action::MoveRight => "Move right",
            Action::Home => "Start",
            Action::End => "End",
            Action::Confirm => "Confirm",
            Action::Cancel => "Back",
            Action::Quit => "Quit",
            Action::NextField => "Next field",
            Action::PrevField => "Previous field",
            Action::Backspace => "Delete back",
            Action::DeleteChar => "Delete forward",
            Action::Submit => "Submit",
            Action::Browse => "Choose file",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keymap {
    #[serde(default)]
    pub preset: KeymapPreset,

    /// Checked before the preset. Overriding an action hides all of the
    /// preset's keys for that action.
    #[serde(default)]
    pub overrides: Vec<KeyBinding>,
}

impl Keymap {
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        self.bindings()
            .into_iter()
            .find(|binding| binding.matches(code, modifiers))
            .map(|binding| binding.action)
    }

    /// Effective bindings, overrides first.
    pub fn bindings(&self) -> Vec<KeyBinding> {
        let mut bindings = self.overrides.clone();
        bindings.extend(
            self.preset
                .bindings()
                .into_iter()
                .filter(|b| !self.overrides.iter().any(|o| o.action == b.action)),
        );
        bindings
    }

    /// Display label of the first key bound to `action`, e.g. "Ctrl+S".
    pub fn key_for(&self, action: Action) -> String {
        self.bindings()
            .into_iter()
            .find(|b| b.action == action)
            .map(|b| b.display())
            .unwrap_or_else(|| "-".to_string())
    }

    /// "Key: Description" pairs joined for a footer line.
    pub fn hints(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .map(|&action| format!("{}: {}", self.key_for(action), action.description()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keymap_is_standard() {
        let keymap = Keymap::default();
        assert_eq!(keymap.preset, KeymapPreset::Standard);
        assert_eq!(
            keymap.get_action(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(Action::Submit)
        );
        assert_eq!(
            keymap.get_action(KeyCode::Esc, KeyModifiers::NONE),
            Some(Action::Cancel)
        );
    }

    #[test]
    fn test_override_shadows_preset_for_same_action() {
        let keymap = Keymap {
            preset: KeymapPreset::Standard,
            overrides: vec![KeyBinding::new("f5", Action::Submit)],
        };
        assert_eq!(
            keymap.get_action(KeyCode::F(5), KeyModifiers::NONE),
            Some(Action::Submit)
        );
        assert_eq!(keymap.get_action(KeyCode::Char('s'), KeyModifiers::CONTROL), None);
        assert_eq!(keymap.key_for(Action::Submit), "F5");
    }

    #[test]
    fn test_emacs_preset() {
        let keymap = Keymap {
            preset: KeymapPreset::Emacs,
            overrides: Vec::new(),
        };
        assert_eq!(
            keymap.get_action(KeyCode::Char('n'), KeyModifiers::CONTROL),
            Some(Action::MoveDown)
        );
        assert_eq!(
            keymap.get_action(KeyCode::Char('g'), KeyModifiers::CONTROL),
            Some(Action::Cancel)
        );
    }

    #[test]
    fn test_hints() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.hints(&[Action::Confirm, Action::Cancel]),
            "Enter: Confirm | Esc: Back"
        );
    }

    #[test]
    fn test_keymap_from_toml() {
        let keymap: Keymap = toml::from_str(
            r#"
preset = "emacs"

[[overrides]]
key = "ctrl+u"
action = "submit"
"#,
        )
        .unwrap();
        assert_eq!(keymap.preset, KeymapPreset::Emacs);
        assert_eq!(
            keymap.get_action(KeyCode::Char('u'), KeyModifiers::CONTROL),
            Some(Action::Submit)
        );
    }
}
