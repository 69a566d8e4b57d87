use super::{Action, KeyBinding};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeymapPreset {
    /// Arrows, Enter, Esc
    #[default]
    Standard,
    /// Standard plus Ctrl+N/P/B/F/G
    Emacs,
}

impl KeymapPreset {
    pub fn bindings(self) -> Vec<KeyBinding> {
        let mut bindings = Vec::new();
        if self == KeymapPreset::Emacs {
            // listed first so they show up in footer hints
            bindings.extend([
                KeyBinding::new("ctrl+p", Action::MoveUp),
                KeyBinding::new("ctrl+n", Action::MoveDown),
                KeyBinding::new("ctrl+b", Action::MoveLeft),
                KeyBinding::new("ctrl+f", Action::MoveRight),
                KeyBinding::new("ctrl+a", Action::Home),
                KeyBinding::new("ctrl+e", Action::End),
                KeyBinding::new("ctrl+g", Action::Cancel),
                KeyBinding::new("ctrl+d", Action::DeleteChar),
            ]);
        }
        bindings.extend([
            KeyBinding::new("up", Action::MoveUp),
            KeyBinding::new("down", Action::MoveDown),
            KeyBinding::new("left", Action::MoveLeft),
            KeyBinding::new("right", Action::MoveRight),
            KeyBinding::new("home", Action::Home),
            KeyBinding::new("end", Action::End),
            KeyBinding::new("enter", Action::Confirm),
            KeyBinding::new("esc", Action::Cancel),
            KeyBinding::new("ctrl+c", Action::Quit),
            KeyBinding::new("ctrl+q", Action::Quit),
            KeyBinding::new("tab", Action::NextField),
            KeyBinding::new("shift+tab", Action::PrevField),
            KeyBinding::new("backspace", Action::Backspace),
            KeyBinding::new("delete", Action::DeleteChar),
            KeyBinding::new("ctrl+s", Action::Submit),
            KeyBinding::new("ctrl+o", Action::Browse),
        ]);
        bindings
    }
}
