use crate::app::ColorsConfig;
use crate::backend::WallpaperBackend;
use crate::boot_cache::BootCache;
use crate::colors::ColorGeneratorRegistry;
use crate::registry::RegistryError;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Bounds for waiting on a freshly started wallpaper daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    ColorsDisabled,
    /// Palette already matched; only the session document was touched.
    AlreadyInSync(PathBuf),
    Regenerated(PathBuf),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no current wallpaper: boot cache empty and the backend reported nothing")]
    NoWallpaper,
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("color generation failed for {}", .0.display())]
    GenerationFailed(PathBuf),
}

/// Boot cache first, then poll the backend until it answers or time runs out.
pub fn resolve_current(
    boot_cache: &BootCache,
    backend: &dyn WallpaperBackend,
    options: &SyncOptions,
) -> Option<PathBuf> {
    if let Some(cached) = boot_cache.read() {
        tracing::debug!("boot cache hit: {}", cached.display());
        return Some(cached);
    }
    wait_for_wallpaper(backend, options)
}

/// Poll `current_wallpaper` every `poll_interval`. The only sleep in the
/// crate; bounded by `timeout` unless that lies past what `Instant` can hold.
pub fn wait_for_wallpaper(backend: &dyn WallpaperBackend, options: &SyncOptions) -> Option<PathBuf> {
    let deadline = Instant::now().checked_add(options.timeout);
    loop {
        if let Some(path) = backend.current_wallpaper() {
            return Some(path);
        }
        let now = Instant::now();
        let nap = match deadline {
            Some(deadline) if now >= deadline => {
                tracing::warn!(
                    "{} reported no wallpaper within {:?}",
                    backend.name(),
                    options.timeout
                );
                return None;
            }
            Some(deadline) => options.poll_interval.min(deadline - now),
            None => options.poll_interval,
        };
        thread::sleep(nap);
    }
}

/// Bring the color palette in line with whatever wallpaper is showing.
/// Running it twice in a row never regenerates twice.
pub fn reconcile(
    colors: &ColorsConfig,
    registry: &ColorGeneratorRegistry,
    backend: &dyn WallpaperBackend,
    boot_cache: &BootCache,
    options: &SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    if !colors.enabled {
        tracing::info!("color generation disabled, nothing to sync");
        return Ok(SyncOutcome::ColorsDisabled);
    }

    let wallpaper = resolve_current(boot_cache, backend, options).ok_or(SyncError::NoWallpaper)?;
    let generator = registry.create(&colors.backend.name, &colors.backend)?;

    if generator.is_cached(&wallpaper) {
        generator.update_session(&wallpaper);
        tracing::info!("colors already match {}", wallpaper.display());
        return Ok(SyncOutcome::AlreadyInSync(wallpaper));
    }

    generator.update_session(&wallpaper);
    if !generator.generate(&wallpaper) {
        return Err(SyncError::GenerationFailed(wallpaper));
    }
    tracing::info!("regenerated colors for {}", wallpaper.display());
    Ok(SyncOutcome::Regenerated(wallpaper))
}
