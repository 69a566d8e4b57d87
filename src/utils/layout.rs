use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A `width_pct` x `height` rectangle centred in `area`.
pub fn center_popup(area: Rect, width_pct: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(width_pct.min(100))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_is_centred_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = center_popup(area, 50, 10);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 15);

        let tiny = center_popup(Rect::new(0, 0, 20, 4), 80, 10);
        assert_eq!(tiny.height, 4);
    }
}
