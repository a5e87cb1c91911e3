use crate::app::WallpaperBackendConfig;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod swww;

pub use swww::SwwwBackend;

/// Transition style understood by the apply daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Simple,
    Fade,
    Left,
    Right,
    Top,
    Bottom,
    Wipe,
    Wave,
    #[default]
    Grow,
    Center,
    Any,
    Outer,
    Random,
    None,
}

impl TransitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionType::Simple => "simple",
            TransitionType::Fade => "fade",
            TransitionType::Left => "left",
            TransitionType::Right => "right",
            TransitionType::Top => "top",
            TransitionType::Bottom => "bottom",
            TransitionType::Wipe => "wipe",
            TransitionType::Wave => "wave",
            TransitionType::Grow => "grow",
            TransitionType::Center => "center",
            TransitionType::Any => "any",
            TransitionType::Outer => "outer",
            TransitionType::Random => "random",
            TransitionType::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub transition_type: TransitionType,
    /// Seconds, fractional.
    pub duration: f32,
    pub fps: u32,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            transition_type: TransitionType::Grow,
            duration: 0.7,
            fps: 144,
        }
    }
}

/// Capability interface of a wallpaper-apply daemon.
///
/// Every method is a blocking call into an external process with a bounded
/// timeout. Failures are never raised: probes answer `false`/`None`, and a
/// `false` from [`WallpaperBackend::set_wallpaper`] means "not applied".
pub trait WallpaperBackend {
    fn name(&self) -> &'static str;

    fn is_daemon_running(&self) -> bool;

    /// Launch the daemon detached from this process. Best-effort.
    fn start_daemon(&self);

    fn current_wallpaper(&self) -> Option<PathBuf>;

    fn set_wallpaper(&self, path: &Path, transition: &Transition) -> bool;
}

pub type WallpaperBackendRegistry = Registry<WallpaperBackendConfig, dyn WallpaperBackend>;

/// Registry with every wallpaper backend shipped in this crate.
pub fn builtin_registry() -> WallpaperBackendRegistry {
    let mut registry = WallpaperBackendRegistry::new("wallpaper");
    registry.register(SwwwBackend::NAME, |_cfg: &WallpaperBackendConfig| {
        Box::new(SwwwBackend::new())
    });
    registry
}

/// Start the daemon unless it is already running.
pub fn ensure_daemon(backend: &dyn WallpaperBackend) {
    if backend.is_daemon_running() {
        return;
    }
    tracing::info!("{} daemon not running, starting it", backend.name());
    backend.start_daemon();
}
