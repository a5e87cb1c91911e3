use super::{scan_directory, WallpaperFile};
use crate::app::Config;
use crate::backend::{Transition, WallpaperBackend};
use crate::boot_cache::BootCache;
use crate::colors::ColorGenerator;
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("{backend} refused to apply {}", path.display())]
    Rejected { backend: &'static str, path: PathBuf },
}

/// What happened to colors after a successful apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStep {
    /// Disabled in config, or no generator configured.
    Skipped,
    Generated,
    Failed,
}

/// Side effects of a successful [`WallpaperManager::set_wallpaper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub boot_cached: bool,
    pub colors: ColorStep,
}

/// Owns the wallpaper collection and the (best-effort) current pointer, and
/// runs the apply sequence: backend, boot cache, colors.
pub struct WallpaperManager {
    directory: PathBuf,
    extensions: Vec<String>,
    transition: Transition,
    colors_enabled: bool,
    backend: Box<dyn WallpaperBackend>,
    colors: Option<Box<dyn ColorGenerator>>,
    boot_cache: BootCache,
    wallpapers: Vec<WallpaperFile>,
    current: Option<PathBuf>,
}

impl WallpaperManager {
    /// Scan the wallpaper directory and work out what is currently shown.
    pub fn new(
        config: &Config,
        backend: Box<dyn WallpaperBackend>,
        colors: Option<Box<dyn ColorGenerator>>,
        boot_cache: BootCache,
    ) -> Result<Self> {
        let mut manager = Self {
            directory: config.wallpaper_dir().to_path_buf(),
            extensions: config.wallpaper.extensions.clone(),
            transition: config.transition(),
            colors_enabled: config.colors.enabled,
            backend,
            colors,
            boot_cache,
            wallpapers: Vec::new(),
            current: None,
        };
        manager.reload()?;
        manager.current = manager
            .backend
            .current_wallpaper()
            .or_else(|| manager.boot_cache.read());
        Ok(manager)
    }

    /// Rebuild the collection from disk.
    pub fn reload(&mut self) -> Result<()> {
        self.wallpapers = scan_directory(&self.directory, &self.extensions)?;
        Ok(())
    }

    /// Apply `path`. If the backend refuses, nothing else happens: the boot
    /// cache and current pointer keep their old values.
    pub fn set_wallpaper(&mut self, path: &Path) -> Result<ApplyReport, ApplyError> {
        if !self.backend.set_wallpaper(path, &self.transition) {
            tracing::warn!("{} failed to apply {}", self.backend.name(), path.display());
            return Err(ApplyError::Rejected {
                backend: self.backend.name(),
                path: path.to_path_buf(),
            });
        }
        tracing::info!("applied {}", path.display());

        let boot_cached = match self.boot_cache.write(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not update boot cache: {:#}", e);
                false
            }
        };

        let colors = match self.colors.as_deref() {
            Some(generator) if self.colors_enabled => {
                if generator.generate(path) {
                    ColorStep::Generated
                } else {
                    ColorStep::Failed
                }
            }
            _ => ColorStep::Skipped,
        };

        self.current = Some(path.to_path_buf());
        Ok(ApplyReport {
            boot_cached,
            colors,
        })
    }

    /// Ask the backend again; `None` from the backend clears the pointer.
    pub fn refresh_current_wallpaper(&mut self) -> Option<&Path> {
        self.current = self.backend.current_wallpaper();
        self.current.as_deref()
    }

    pub fn wallpapers(&self) -> &[WallpaperFile] {
        &self.wallpapers
    }

    pub fn current_wallpaper(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn is_current(&self, path: &Path) -> bool {
        self.current.as_deref() == Some(path)
    }

    pub fn wallpaper_dir(&self) -> &Path {
        &self.directory
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.wallpapers.iter().position(|w| w.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default)]
    struct BackendLog {
        applied: RefCell<Vec<PathBuf>>,
        current: RefCell<Option<PathBuf>>,
    }

    struct FakeBackend {
        accept: bool,
        log: Rc<BackendLog>,
    }

    impl WallpaperBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }
        fn is_daemon_running(&self) -> bool {
            true
        }
        fn start_daemon(&self) {}
        fn current_wallpaper(&self) -> Option<PathBuf> {
            self.log.current.borrow().clone()
        }
        fn set_wallpaper(&self, path: &Path, _transition: &Transition) -> bool {
            self.log.applied.borrow_mut().push(path.to_path_buf());
            self.accept
        }
    }

    struct FakeColors {
        ok: bool,
        generated: Rc<Cell<usize>>,
    }

    impl ColorGenerator for FakeColors {
        fn name(&self) -> &'static str {
            "fake"
        }
        fn generate(&self, _wallpaper: &Path) -> bool {
            self.generated.set(self.generated.get() + 1);
            self.ok
        }
        fn update_session(&self, _wallpaper: &Path) -> bool {
            true
        }
        fn colors_path(&self) -> PathBuf {
            PathBuf::from("/nonexistent/colors.json")
        }
        fn is_cached(&self, _wallpaper: &Path) -> bool {
            false
        }
    }

    struct Fixture {
        tmp: TempDir,
        config: Config,
        backend: Rc<BackendLog>,
        generated: Rc<Cell<usize>>,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let mut config = Config::default();
            config.wallpaper.directory = tmp.path().join("walls");
            fs::create_dir_all(&config.wallpaper.directory).unwrap();
            Self {
                tmp,
                config,
                backend: Rc::new(BackendLog::default()),
                generated: Rc::new(Cell::new(0)),
            }
        }

        fn wallpaper(&self, name: &str) -> PathBuf {
            let path = self.config.wallpaper.directory.join(name);
            fs::write(&path, b"img").unwrap();
            path
        }

        fn boot_cache(&self) -> BootCache {
            BootCache::new(self.tmp.path().join("state/last-wallpaper"))
        }

        fn manager(&self, accept: bool, colors_ok: bool) -> WallpaperManager {
            let colors: Box<dyn ColorGenerator> = Box::new(FakeColors {
                ok: colors_ok,
                generated: self.generated.clone(),
            });
            WallpaperManager::new(
                &self.config,
                Box::new(FakeBackend {
                    accept,
                    log: self.backend.clone(),
                }),
                Some(colors),
                self.boot_cache(),
            )
            .unwrap()
        }
    }

    #[test]
    fn successful_apply_runs_every_step() {
        let fx = Fixture::new();
        let wp = fx.wallpaper("a.png");
        let mut manager = fx.manager(true, true);

        let report = manager.set_wallpaper(&wp).unwrap();
        assert_eq!(
            report,
            ApplyReport {
                boot_cached: true,
                colors: ColorStep::Generated
            }
        );
        assert!(manager.is_current(&wp));
        assert_eq!(fx.boot_cache().read(), Some(wp.clone()));
        assert_eq!(*fx.backend.applied.borrow(), vec![wp]);
        assert_eq!(fx.generated.get(), 1);
    }

    #[test]
    fn failing_backend_changes_nothing() {
        let fx = Fixture::new();
        let old = fx.wallpaper("old.png");
        let new = fx.wallpaper("new.png");
        fx.boot_cache().write(&old).unwrap();
        let mut manager = fx.manager(false, true);
        assert_eq!(manager.current_wallpaper(), Some(old.as_path()));

        let err = manager.set_wallpaper(&new).unwrap_err();
        assert!(matches!(err, ApplyError::Rejected { backend: "fake", .. }));
        assert_eq!(manager.current_wallpaper(), Some(old.as_path()));
        assert_eq!(fx.boot_cache().read(), Some(old));
        assert_eq!(fx.generated.get(), 0);
    }

    #[test]
    fn color_failure_does_not_roll_back() {
        let fx = Fixture::new();
        let wp = fx.wallpaper("a.png");
        let mut manager = fx.manager(true, false);

        let report = manager.set_wallpaper(&wp).unwrap();
        assert_eq!(report.colors, ColorStep::Failed);
        assert!(manager.is_current(&wp));
        assert_eq!(fx.boot_cache().read(), Some(wp));
    }

    #[test]
    fn disabled_colors_are_never_generated() {
        let mut fx = Fixture::new();
        fx.config.colors.enabled = false;
        let wp = fx.wallpaper("a.png");
        let mut manager = fx.manager(true, true);

        let report = manager.set_wallpaper(&wp).unwrap();
        assert_eq!(report.colors, ColorStep::Skipped);
        assert_eq!(fx.generated.get(), 0);
    }

    #[test]
    fn missing_generator_is_skipped() {
        let fx = Fixture::new();
        let wp = fx.wallpaper("a.png");
        let mut manager = WallpaperManager::new(
            &fx.config,
            Box::new(FakeBackend {
                accept: true,
                log: fx.backend.clone(),
            }),
            None,
            fx.boot_cache(),
        )
        .unwrap();

        assert_eq!(manager.set_wallpaper(&wp).unwrap().colors, ColorStep::Skipped);
    }

    #[test]
    fn backend_query_wins_over_boot_cache() {
        let fx = Fixture::new();
        let cached = fx.wallpaper("cached.png");
        let live = fx.wallpaper("live.png");
        fx.boot_cache().write(&cached).unwrap();
        *fx.backend.current.borrow_mut() = Some(live.clone());

        let manager = fx.manager(true, true);
        assert!(manager.is_current(&live));
    }

    #[test]
    fn refresh_overwrites_pointer_with_backend_answer() {
        let fx = Fixture::new();
        let a = fx.wallpaper("a.png");
        let b = fx.wallpaper("b.png");
        let mut manager = fx.manager(true, true);
        manager.set_wallpaper(&a).unwrap();

        *fx.backend.current.borrow_mut() = Some(b.clone());
        assert_eq!(manager.refresh_current_wallpaper(), Some(b.as_path()));

        *fx.backend.current.borrow_mut() = None;
        assert_eq!(manager.refresh_current_wallpaper(), None);
    }

    #[test]
    fn reload_picks_up_new_files() {
        let fx = Fixture::new();
        let mut manager = fx.manager(true, true);
        assert!(manager.wallpapers().is_empty());

        let wp = fx.wallpaper("fresh.webp");
        manager.reload().unwrap();
        assert_eq!(manager.wallpapers().len(), 1);
        assert_eq!(manager.position_of(&wp), Some(0));
        assert_eq!(manager.position_of(Path::new("/elsewhere.png")), None);
    }
}
