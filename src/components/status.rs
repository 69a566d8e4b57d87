use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// The one-line feedback message under a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let style = match self.kind {
            StatusKind::Info => t.text_style(),
            StatusKind::Success => t.success_style(),
            StatusKind::Error => t.error_style(),
        };
        let widget = Paragraph::new(self.text.as_str())
            .style(style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(t.border_style())
                    .title(" Status "),
            );
        frame.render_widget(widget, area);
    }
}
