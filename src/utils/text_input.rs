use crate::keymap::Action;
use crossterm::event::{KeyCode, KeyModifiers};

/// Single-line editable text with a char-indexed cursor.
///
/// ```
/// use hwsubmit::utils::TextInput;
///
/// let mut input = TextInput::new();
/// input.insert_char('4');
/// input.insert_char('2');
/// assert_eq!(input.text(), "42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_text(text);
        input
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Cursor position in chars, not bytes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when only whitespace has been typed.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Apply an editing action. Returns false for actions that aren't editing.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::Home => self.move_home(),
            Action::End => self.move_end(),
            Action::Backspace => self.backspace(),
            Action::DeleteChar => self.delete(),
            _ => return false,
        }
        true
    }

    /// Feed a key press: mapped editing actions first, then plain characters.
    ///
    /// Characters typed with Ctrl or Alt are never inserted.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, action: Option<Action>) -> bool {
        if let Some(action) = action {
            if self.handle_action(action) {
                return true;
            }
        }
        match code {
            KeyCode::Char(c)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor_movement() {
        let mut input = TextInput::new();
        for c in "abd".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.insert_char('c');
        assert_eq!(input.text(), "abcd");
        assert_eq!(input.cursor(), 3);
        input.move_home();
        input.delete();
        assert_eq!(input.text(), "bcd");
        input.move_end();
        input.backspace();
        assert_eq!(input.text(), "bc");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_text("学号");
        input.move_left();
        input.insert_char('x');
        assert_eq!(input.text(), "学x号");
        input.backspace();
        input.backspace();
        assert_eq!(input.text(), "号");
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut input = TextInput::new();
        input.backspace();
        input.delete();
        input.move_left();
        input.move_right();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_blank_and_trimmed() {
        let input = TextInput::with_text("  42 ");
        assert!(!input.is_blank());
        assert_eq!(input.text_trimmed(), "42");
        assert!(TextInput::with_text("   ").is_blank());
    }

    #[test]
    fn test_handle_key_ignores_control_chords() {
        let mut input = TextInput::new();
        assert!(input.handle_key(KeyCode::Char('a'), KeyModifiers::NONE, None));
        assert!(input.handle_key(KeyCode::Char('B'), KeyModifiers::SHIFT, None));
        assert!(!input.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL, None));
        assert!(input.handle_key(KeyCode::Backspace, KeyModifiers::NONE, Some(Action::Backspace)));
        assert_eq!(input.text(), "a");
    }
}
