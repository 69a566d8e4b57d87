use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Key hint bar at the bottom of each view
pub struct Footer;

impl Footer {
    /// `text` is a `" | "`-separated list of `Key: Description` hints.
    pub fn render(frame: &mut Frame, area: Rect, text: &str) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Rounded)
            .border_style(theme().border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Self::spans(text)).alignment(Alignment::Center),
            inner,
        );
    }

    fn spans(text: &str) -> Line<'_> {
        let t = theme();
        let mut spans = Vec::new();
        for (i, part) in text.split(" | ").enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", t.muted_style()));
            }
            match part.split_once(": ") {
                Some((key, description)) => {
                    spans.push(Span::styled(key, t.emphasis_style()));
                    spans.push(Span::styled(format!(": {}", description), t.text_style()));
                }
                None => spans.push(Span::styled(part, t.text_style())),
            }
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_keys_get_their_own_span() {
        let line = Footer::spans("Enter: Log in | Esc: Back");
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["Enter", ": Log in", " | ", "Esc", ": Back"]);
    }
}
