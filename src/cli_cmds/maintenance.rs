use anyhow::Result;
use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use crate::app::Config;
use crate::boot_cache::BootCache;
use crate::scheduler::IdleScheduler;
use crate::sync::{self, SyncOutcome};
use crate::thumbnail::{PrewarmSummary, ThumbnailCache};
use crate::wallpaper::WallpaperManager;
use crate::{backend, colors};

/// Bring colors in line with the wallpaper on screen. Exit code 1 on failure.
pub fn cmd_sync(config: &Config) -> Result<ExitCode> {
    let wallpaper_backend = backend::builtin_registry()
        .create(&config.wallpaper.backend.name, &config.wallpaper.backend)?;

    let outcome = sync::reconcile(
        &config.colors,
        &colors::builtin_registry(),
        wallpaper_backend.as_ref(),
        &BootCache::new(config.boot_cache_file()),
        &config.sync_options(),
    );

    match outcome {
        Ok(SyncOutcome::ColorsDisabled) => println!("Color generation disabled"),
        Ok(SyncOutcome::AlreadyInSync(path)) => {
            println!("Colors already match {}", path.display())
        }
        Ok(SyncOutcome::Regenerated(path)) => {
            println!("Regenerated colors for {}", path.display())
        }
        Err(e) => {
            eprintln!("Sync failed: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Pre-warm every thumbnail, by default through the idle scheduler with
/// progress on stderr.
pub fn cmd_thumbs(config: &Config, manager: &WallpaperManager, blocking: bool) {
    let cache = ThumbnailCache::new(config.thumbnail_dir(), config.thumbnails.width);
    let paths: Vec<PathBuf> = manager
        .wallpapers()
        .iter()
        .map(|wp| wp.path.clone())
        .collect();
    let total = cache.stale_paths(&paths).len();

    let summary = if blocking {
        eprintln!("Generating {} thumbnails...", total);
        cache.ensure_thumbnails(&paths)
    } else {
        prewarm_with_progress(&cache, &paths, total)
    };

    println!(
        "{} wallpapers: {} generated, {} failed, {} up to date",
        paths.len(),
        summary.generated,
        summary.failed,
        paths.len() - total
    );
    println!("Cache: {}", cache.cache_dir().display());
}

fn prewarm_with_progress(cache: &ThumbnailCache, paths: &[PathBuf], total: usize) -> PrewarmSummary {
    let finished = Rc::new(Cell::new(None::<PrewarmSummary>));
    let mut scheduler = IdleScheduler::new();
    let done = finished.clone();
    cache.ensure_thumbnails_async(paths, &mut scheduler, move |summary| {
        done.set(Some(summary));
    });

    let mut processed = 0;
    while scheduler.run_once() {
        processed += 1;
        eprint!("\rGenerating thumbnails... {}/{}", processed, total);
    }
    if processed > 0 {
        eprintln!(" done!");
    }

    finished.get().unwrap_or_default()
}
