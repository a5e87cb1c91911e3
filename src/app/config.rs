use super::ViewMode;
use crate::backend::{Transition, TransitionType};
use crate::sync::SyncOptions;
use crate::thumbnail::DEFAULT_THUMB_WIDTH;
use crate::utils::{expand_tilde, DEFAULT_EXTENSIONS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "wallpick";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub wallpaper: WallpaperConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WallpaperConfig {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub backend: WallpaperBackendConfig,
}

/// Which apply daemon to drive and how transitions look.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WallpaperBackendConfig {
    pub name: String,
    pub transition_type: TransitionType,
    /// Seconds
    pub transition_duration: f32,
    pub transition_fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorsConfig {
    pub enabled: bool,
    pub backend: ColorBackendConfig,
}

/// Which palette generator to drive and where its state lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorBackendConfig {
    pub name: String,
    pub state_dir: PathBuf,
    pub config_dir: PathBuf,
    pub shell_dir: PathBuf,
    pub session_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub width: u32,
    /// Overrides `<state dir>/thumbnails`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Boot sync polling bounds (used only when no boot cache entry exists)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub default_view: ViewMode,
    pub grid_columns: usize,
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| home().join("Pictures"))
                .join("Wallpapers"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            backend: WallpaperBackendConfig::default(),
        }
    }
}

impl Default for WallpaperBackendConfig {
    fn default() -> Self {
        let transition = Transition::default();
        Self {
            name: "swww".to_string(),
            transition_type: transition.transition_type,
            transition_duration: transition.duration,
            transition_fps: transition.fps,
        }
    }
}

impl WallpaperBackendConfig {
    pub fn transition(&self) -> Transition {
        Transition {
            transition_type: self.transition_type,
            duration: self.transition_duration,
            fps: self.transition_fps,
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: ColorBackendConfig::default(),
        }
    }
}

impl Default for ColorBackendConfig {
    fn default() -> Self {
        let home = home();
        Self {
            name: "dms".to_string(),
            state_dir: home.join(".cache/DankMaterialShell"),
            config_dir: home.join(".config/DankMaterialShell"),
            shell_dir: PathBuf::from("/usr/share/quickshell/dms"),
            session_file: home.join(".local/state/DankMaterialShell/session.json"),
        }
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_THUMB_WIDTH,
            directory: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            timeout_secs: 10,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: ViewMode::Carousel,
            grid_columns: 4,
        }
    }
}

impl Config {
    /// Return the path to the configuration file.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", APP_NAME, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| home().join(".config").join(APP_NAME))
            .join("config.toml")
    }

    /// Per-user state directory (boot cache, thumbnails, log).
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .unwrap_or_else(|| home().join(".local/state"))
            .join(APP_NAME)
    }

    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing defaults there on first run.
    /// An unparseable file is reported and left untouched; defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            match toml::from_str::<Config>(&data) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse config at {}: {}", path.display(), e);
                    eprintln!(
                        "Warning: Failed to parse config at {}, using defaults.",
                        path.display()
                    );
                    Config::default()
                }
            }
        } else {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!("wrote default config to {}", path.display());
            config
        };

        config.expand_paths();
        Ok(config)
    }

    /// Save config to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(self)?;
        fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    fn expand_paths(&mut self) {
        let backend = &mut self.colors.backend;
        for path in [
            &mut self.wallpaper.directory,
            &mut backend.state_dir,
            &mut backend.config_dir,
            &mut backend.shell_dir,
            &mut backend.session_file,
        ] {
            *path = expand_tilde(path);
        }
        if let Some(dir) = self.thumbnails.directory.as_mut() {
            *dir = expand_tilde(dir);
        }
    }

    pub fn wallpaper_dir(&self) -> &Path {
        &self.wallpaper.directory
    }

    pub fn transition(&self) -> Transition {
        self.wallpaper.backend.transition()
    }

    pub fn boot_cache_file(&self) -> PathBuf {
        Self::state_dir().join("last-wallpaper")
    }

    pub fn thumbnail_dir(&self) -> PathBuf {
        self.thumbnails
            .directory
            .clone()
            .unwrap_or_else(|| Self::state_dir().join("thumbnails"))
    }

    /// Picker log; lives beside the boot cache.
    pub fn log_file() -> PathBuf {
        Self::state_dir().join("wallpick.log")
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            poll_interval: Duration::from_millis(self.sync.poll_interval_ms.max(1)),
            timeout: Duration::from_secs(self.sync.timeout_secs),
        }
    }
}
