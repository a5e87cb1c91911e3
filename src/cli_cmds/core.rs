use anyhow::{bail, Result};
use std::path::Path;
use std::process::{Command, ExitCode};
use std::time::Duration;

use crate::app::{self, App, Config};
use crate::boot_cache::BootCache;
use crate::instance::{self, Launch};
use crate::ui::preview::PreviewCache;
use crate::wallpaper::{ColorStep, WallpaperManager};
use crate::{backend, colors, process};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the configured backends and scan the wallpaper directory.
/// Unknown backend names are configuration errors.
pub fn build_manager(config: &Config, start_daemon: bool) -> Result<WallpaperManager> {
    let wallpaper_backend = backend::builtin_registry()
        .create(&config.wallpaper.backend.name, &config.wallpaper.backend)?;
    if start_daemon {
        backend::ensure_daemon(wallpaper_backend.as_ref());
    }

    let color_generator = if config.colors.enabled {
        Some(
            colors::builtin_registry()
                .create(&config.colors.backend.name, &config.colors.backend)?,
        )
    } else {
        None
    };

    WallpaperManager::new(
        config,
        wallpaper_backend,
        color_generator,
        BootCache::new(config.boot_cache_file()),
    )
}

pub fn cmd_list(manager: &WallpaperManager) {
    if manager.wallpapers().is_empty() {
        eprintln!("No wallpapers found in: {}", manager.wallpaper_dir().display());
        return;
    }

    for wp in manager.wallpapers() {
        let marker = if manager.is_current(&wp.path) { '*' } else { ' ' };
        println!("{} {}", marker, wp.path.display());
    }
}

pub fn cmd_set(manager: &mut WallpaperManager, path: &Path) -> Result<()> {
    let path = std::path::absolute(path)?;
    if !path.is_file() {
        bail!("Not a file: {}", path.display());
    }

    let report = manager.set_wallpaper(&path)?;
    println!("{}", path.display());
    if report.colors == ColorStep::Failed {
        eprintln!("Warning: color generation failed");
    }
    if !report.boot_cached {
        eprintln!("Warning: could not save the boot cache");
    }
    Ok(())
}

pub fn cmd_current(manager: &WallpaperManager) {
    match manager.current_wallpaper() {
        Some(path) => println!("{}", path.display()),
        None => eprintln!("No current wallpaper known"),
    }
}

pub fn cmd_backends() {
    let wallpaper = backend::builtin_registry();
    let colors = colors::builtin_registry();
    println!("{} backends: {}", wallpaper.kind(), wallpaper.names().join(", "));
    println!("{} backends: {}", colors.kind(), colors.names().join(", "));
}

/// Open the picker, or close the one already running.
pub fn cmd_pick(config: Config) -> Result<ExitCode> {
    let _guard = match instance::acquire_or_toggle(&instance::pid_file())? {
        Launch::Toggled(pid) => {
            tracing::info!("closed running picker (pid {})", pid);
            return Ok(ExitCode::SUCCESS);
        }
        Launch::Acquired(guard) => guard,
    };

    let manager = build_manager(&config, true)?;
    if manager.wallpapers().is_empty() {
        let message = format!("No wallpapers found in {}", manager.wallpaper_dir().display());
        eprintln!("{}", message);
        notify(&message);
        return Ok(ExitCode::FAILURE);
    }

    app::run_tui(App::new(config, manager, PreviewCache::detect()))?;
    Ok(ExitCode::SUCCESS)
}

/// Desktop notification; best effort.
fn notify(message: &str) {
    let mut cmd = Command::new("notify-send");
    cmd.args(["wallpick", message]);
    if let Err(e) = process::run_with_timeout(&mut cmd, NOTIFY_TIMEOUT) {
        tracing::debug!("notification not shown: {}", e);
    }
}
