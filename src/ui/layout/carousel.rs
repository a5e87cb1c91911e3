use super::{center_vertically, draw_tile};
use crate::app::App;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Previous, selected and next wallpaper side by side; the neighbours are
/// drawn smaller.
pub(super) fn draw_carousel(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let len = app.manager.wallpapers().len();
    if len == 0 {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area);
    let side_height = (area.height * 2 / 3).max(3);
    let selected = app.selected;

    if len > 2 {
        let prev = (selected + len - 1) % len;
        draw_tile(f, app, center_vertically(columns[0], side_height), prev, false, theme);
    }
    draw_tile(f, app, columns[1], selected, true, theme);
    if len > 1 {
        let next = (selected + 1) % len;
        draw_tile(f, app, center_vertically(columns[2], side_height), next, false, theme);
    }
}
