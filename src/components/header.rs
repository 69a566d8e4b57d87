use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

/// Title bar shared by both views
pub struct Header;

impl Header {
    /// Draw `title` in the border and `description` inside.
    /// `badge` is right-aligned on the description line, e.g. the logged-in screen id.
    pub fn render(frame: &mut Frame, area: Rect, title: &str, description: &str, badge: Option<&str>) {
        let t = theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_focused_style())
            .title(format!(" {} ", title))
            .title_style(t.title_style())
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let badge_width = badge.map_or(0, |b| b.chars().count() as u16 + 1);
        let [desc_area, badge_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(badge_width)]).areas(inner);

        frame.render_widget(
            Paragraph::new(description)
                .style(t.text_style())
                .wrap(Wrap { trim: true }),
            desc_area,
        );
        if let Some(badge) = badge {
            frame.render_widget(
                Paragraph::new(badge)
                    .style(t.emphasis_style())
                    .alignment(Alignment::Right),
                badge_area,
            );
        }
    }
}
