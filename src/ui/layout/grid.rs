use super::draw_tile;
use crate::app::App;
use crate::ui::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Rows of `grid_columns` tiles, paged so the selection stays visible.
pub(super) fn draw_grid(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let columns = app.grid_columns();
    let tile_w = area.width / columns.min(usize::from(u16::MAX)) as u16;
    if tile_w < 4 {
        return;
    }
    let tile_h = tile_height(tile_w);
    let visible_rows = usize::from((area.height / tile_h).max(1));
    let first = first_visible(app.selected, columns, visible_rows);
    let len = app.manager.wallpapers().len();

    for slot in 0..visible_rows * columns {
        let index = first + slot;
        if index >= len {
            break;
        }
        let row = (slot / columns) as u16;
        let col = (slot % columns) as u16;
        let tile = Rect::new(
            area.x + col * tile_w,
            area.y + row * tile_h,
            tile_w,
            tile_h,
        )
        .intersection(area);
        let selected = index == app.selected;
        draw_tile(f, app, tile, index, selected, theme);
    }
}

/// Tile height for a 16:9 preview in cells that are twice as tall as wide,
/// plus the border.
fn tile_height(tile_w: u16) -> u16 {
    (tile_w.saturating_sub(2) * 9 / 32 + 2).max(4)
}

/// Index of the first tile on the page holding `selected`.
fn first_visible(selected: usize, columns: usize, visible_rows: usize) -> usize {
    let page = (columns * visible_rows).max(1);
    selected / page * page
}
