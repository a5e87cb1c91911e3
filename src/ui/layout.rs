use crate::app::{App, ViewMode};
use crate::ui::preview::fit_aspect;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui_image::StatefulImage;

mod carousel;
mod grid;
mod header;

use carousel::draw_carousel;
use grid::draw_grid;
use header::{draw_footer, draw_header, draw_status};

pub fn draw(f: &mut Frame, app: &mut App) {
    let theme = app.ui.theme.clone();
    let area = f.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(6),    // Wallpapers
            Constraint::Length(1), // Status
            Constraint::Length(1), // Key hints
        ])
        .split(inner);

    draw_header(f, app, chunks[0], &theme);

    if app.manager.wallpapers().is_empty() {
        let empty = Paragraph::new(format!(
            "No wallpapers in {}",
            app.manager.wallpaper_dir().display()
        ))
        .style(Style::default().fg(theme.fg_muted))
        .alignment(Alignment::Center);
        f.render_widget(empty, center_vertically(chunks[1], 1));
    } else {
        match app.ui.view {
            ViewMode::Carousel => draw_carousel(f, app, chunks[1], &theme),
            ViewMode::Grid => draw_grid(f, app, chunks[1], &theme),
        }
    }

    draw_status(f, app, chunks[2], &theme);
    draw_footer(f, chunks[3], &theme);
}

fn center_vertically(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x, y, area.width, height)
}

/// One bordered wallpaper tile titled with the file name. `●` marks the
/// wallpaper currently on screen. The preview keeps a 16:9 frame in cells
/// twice as tall as wide.
fn draw_tile(f: &mut Frame, app: &mut App, area: Rect, index: usize, selected: bool, theme: &Theme) {
    let Some(wp) = app.manager.wallpapers().get(index) else {
        return;
    };
    let path = wp.path.clone();
    let name = wp.file_name();
    let is_current = app.manager.is_current(&path);

    let title = if is_current {
        format!(" ● {} ", name)
    } else {
        format!(" {} ", name)
    };
    let (border, title_style) = if selected {
        (
            theme.highlight,
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
    } else if is_current {
        (theme.success, Style::default().fg(theme.success))
    } else {
        (theme.border, Style::default().fg(theme.fg_secondary))
    };

    let block = Block::default()
        .title(title)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (w, h) = fit_aspect(inner.width, inner.height, 32, 9);
    let x = inner.x + inner.width.saturating_sub(w) / 2;
    let y = inner.y + inner.height.saturating_sub(h) / 2;
    let image_area = Rect::new(x, y, w, h);

    match app.previews.get(&app.thumbnails, &path) {
        Some(protocol) if w > 0 && h > 0 => {
            f.render_stateful_widget(StatefulImage::new(None), image_area, protocol);
        }
        _ => {
            let placeholder = Paragraph::new("…")
                .style(Style::default().fg(theme.fg_muted))
                .alignment(Alignment::Center);
            f.render_widget(placeholder, center_vertically(inner, 1));
        }
    }
}
