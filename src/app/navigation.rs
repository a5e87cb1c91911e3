use super::{App, ViewMode};
use crate::wallpaper::WallpaperFile;

impl App {
    /// Return the currently selected wallpaper, if any.
    pub fn selected_wallpaper(&self) -> Option<&WallpaperFile> {
        self.manager.wallpapers().get(self.selected)
    }

    pub fn grid_columns(&self) -> usize {
        self.config.ui.grid_columns.max(1)
    }

    pub(super) fn clamp_selection(&mut self) {
        let len = self.manager.wallpapers().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Select the next wallpaper, wrapping around.
    pub fn next_wallpaper(&mut self) {
        let len = self.manager.wallpapers().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Select the previous wallpaper, wrapping around.
    pub fn prev_wallpaper(&mut self) {
        let len = self.manager.wallpapers().len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// One row down in the grid; no-op in the carousel.
    pub fn row_down(&mut self) {
        if self.ui.view != ViewMode::Grid {
            return;
        }
        let target = self.selected + self.grid_columns();
        if target < self.manager.wallpapers().len() {
            self.selected = target;
        }
    }

    /// One row up in the grid; no-op in the carousel.
    pub fn row_up(&mut self) {
        if self.ui.view != ViewMode::Grid {
            return;
        }
        if let Some(target) = self.selected.checked_sub(self.grid_columns()) {
            self.selected = target;
        }
    }

    pub fn toggle_view(&mut self) {
        self.ui.view = self.ui.view.toggle();
    }
}
