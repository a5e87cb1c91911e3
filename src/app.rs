use crate::scheduler::IdleScheduler;
use crate::thumbnail::{PrewarmSummary, ThumbnailCache};
use crate::ui::preview::PreviewCache;
use crate::ui::theme::Theme;
use crate::wallpaper::WallpaperManager;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

mod actions;
mod config;
mod navigation;
mod runtime;

pub use config::{ColorBackendConfig, ColorsConfig, Config, WallpaperBackendConfig};
pub use runtime::run_tui;

/// How the picker lays out wallpapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Carousel,
    Grid,
}

impl ViewMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ViewMode::Carousel => "Carousel",
            ViewMode::Grid => "Grid",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Carousel => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Carousel,
        }
    }
}

/// Transient UI state.
pub struct UiState {
    pub should_quit: bool,
    pub view: ViewMode,
    pub status_message: Option<String>,
    pub theme: Theme,
}

/// Progress of the background thumbnail pre-warm.
#[derive(Default)]
pub struct PrewarmState {
    pub total: usize,
    pub ticks: usize,
    /// A rescan arrived mid-run; start another pass when this one ends.
    pub rerun: bool,
    /// Filled by the completion callback.
    finished: Rc<Cell<Option<PrewarmSummary>>>,
}

pub struct App {
    pub config: Config,
    pub manager: WallpaperManager,
    pub thumbnails: ThumbnailCache,
    pub scheduler: IdleScheduler,
    pub ui: UiState,
    pub selected: usize,
    pub prewarm: PrewarmState,
    pub previews: PreviewCache,
}

impl App {
    pub fn new(config: Config, manager: WallpaperManager, previews: PreviewCache) -> Self {
        let thumbnails = ThumbnailCache::new(config.thumbnail_dir(), config.thumbnails.width);
        let selected = manager
            .current_wallpaper()
            .and_then(|current| manager.position_of(current))
            .unwrap_or(0);
        let view = config.ui.default_view;

        let mut app = Self {
            config,
            manager,
            thumbnails,
            scheduler: IdleScheduler::new(),
            ui: UiState {
                should_quit: false,
                view,
                status_message: None,
                theme: Theme::detect(),
            },
            selected,
            prewarm: PrewarmState::default(),
            previews,
        };
        app.start_prewarm();
        app
    }
}
