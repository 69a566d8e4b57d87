use super::Action;
use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

/// One key string ("ctrl+s", "shift+tab", "q") bound to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

impl KeyBinding {
    pub fn new(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
        }
    }

    /// Unparseable key strings never match.
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let Ok((want_code, want_mods)) = parse_key(&self.key) else {
            return false;
        };
        let (code, modifiers) = normalize(code, modifiers);
        want_code == code && want_mods == modifiers
    }

    pub fn display(&self) -> String {
        self.key
            .split('+')
            .map(|part| {
                let part = part.trim().to_lowercase();
                match part.as_str() {
                    "ctrl" | "control" => "Ctrl".to_string(),
                    "alt" => "Alt".to_string(),
                    "shift" => "Shift".to_string(),
                    "up" => "↑".to_string(),
                    "down" => "↓".to_string(),
                    "left" => "←".to_string(),
                    "right" => "→".to_string(),
                    "enter" => "Enter".to_string(),
                    "esc" => "Esc".to_string(),
                    "tab" => "Tab".to_string(),
                    "backspace" => "Backspace".to_string(),
                    "delete" => "Del".to_string(),
                    "home" => "Home".to_string(),
                    "end" => "End".to_string(),
                    _ => part.to_uppercase(),
                }
            })
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Terminals report Shift+Tab as `BackTab`, often with SHIFT set as well.
fn normalize(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::BackTab => (KeyCode::Tab, modifiers | KeyModifiers::SHIFT),
        _ => (code, modifiers),
    }
}

fn parse_key(key: &str) -> Result<(KeyCode, KeyModifiers), String> {
    let key = key.trim().to_lowercase();
    let (mods, last) = match key.rsplit_once('+') {
        // "ctrl++" and bare "+" both mean the plus key
        Some((mods, "")) => (mods.trim_end_matches('+'), "+"),
        Some((mods, last)) => (mods, last),
        None => ("", key.as_str()),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        modifiers |= match part {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" | "option" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            other => return Err(format!("Unknown modifier: {}", other)),
        };
    }

    let code = match last.trim() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        "backtab" => {
            modifiers |= KeyModifiers::SHIFT;
            KeyCode::Tab
        }
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        f if f.len() > 1 && f.starts_with('f') => f[1..]
            .parse::<u8>()
            .map(KeyCode::F)
            .map_err(|_| format!("Unknown key: {}", f))?,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("Unknown key: {}", other)),
            }
        }
    };
    Ok((code, modifiers))
}
