use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// A one-line bordered push button.
///
/// While `busy` is set the button shows its busy label and is drawn disabled,
/// so the user can see a request is already running.
pub struct Button<'a> {
    label: &'a str,
    busy_label: Option<&'a str>,
    focused: bool,
    enabled: bool,
    busy: bool,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            busy_label: None,
            focused: false,
            enabled: true,
            busy: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn busy(mut self, busy: bool, label: &'a str) -> Self {
        self.busy = busy;
        self.busy_label = Some(label);
        self
    }

    fn text(&self) -> &'a str {
        match (self.busy, self.busy_label) {
            (true, Some(label)) => label,
            _ => self.label,
        }
    }
}

impl Widget for Button<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = theme();
        let active = self.enabled && !self.busy;
        let (border, text) = if !active {
            (t.disabled_style(), t.disabled_style())
        } else if self.focused {
            (t.border_focused_style(), t.highlight_style())
        } else {
            (t.border_style(), t.text_style())
        };
        Paragraph::new(self.text())
            .alignment(Alignment::Center)
            .style(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(button: Button) -> String {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        button.render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 1)].symbol()).collect()
    }

    #[test]
    fn test_busy_label_replaces_label() {
        assert!(rendered(Button::new("Log in")).contains("Log in"));
        let busy = Button::new("Log in").busy(true, "Verifying...");
        assert!(rendered(busy).contains("Verifying..."));
    }
}
