//! Bordered, optionally masked rendering of a [`TextInput`].

use crate::styles::theme;
use crate::utils::TextInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub struct TextInputWidget<'a> {
    input: &'a TextInput,
    title: Option<&'a str>,
    placeholder: Option<&'a str>,
    focused: bool,
    disabled: bool,
    masked: bool,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self {
            input,
            title: None,
            placeholder: None,
            focused: false,
            disabled: false,
            masked: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Show one bullet per character instead of the text.
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    fn display_text(&self) -> String {
        let text = self.input.text();
        if text.is_empty() {
            self.placeholder.unwrap_or_default().to_string()
        } else if self.masked {
            "•".repeat(text.chars().count())
        } else {
            text.to_string()
        }
    }

    fn block(&self) -> Block<'a> {
        let t = theme();
        let border_style = if self.disabled {
            t.disabled_style()
        } else if self.focused {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        if let Some(title) = self.title {
            block = block.title(format!(" {} ", title));
        }
        block
    }

    /// Cursor cell inside `area`, when the field is being edited.
    fn cursor_position(&self, area: Rect) -> Option<Position> {
        if !self.focused || self.disabled {
            return None;
        }
        let inner = self.block().inner(area);
        let offset = self.input.cursor().min(inner.width.saturating_sub(1) as usize) as u16;
        Some(Position::new(inner.x + offset, inner.y))
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = theme();
        let style = if self.disabled || self.input.text().is_empty() {
            t.muted_style()
        } else {
            t.text_style()
        };
        Paragraph::new(self.display_text())
            .block(self.block())
            .style(style)
            .render(area, buf);
    }
}

/// Renders the widget and places the terminal cursor when it is focused.
pub trait TextInputWidgetExt {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect);
}

impl TextInputWidgetExt for Frame<'_> {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect) {
        let cursor = widget.cursor_position(area);
        self.render_widget(widget, area);
        if let Some(position) = cursor {
            self.set_cursor_position(position);
        }
    }
}
