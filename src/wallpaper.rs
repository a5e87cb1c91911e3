use crate::utils::has_allowed_extension;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

mod manager;

pub use manager::{ApplyError, ApplyReport, ColorStep, WallpaperManager};

/// One image in the wallpaper directory. Rebuilt on every scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Lowercase, without the dot
    pub extension: String,
}

impl WallpaperFile {
    fn from_entry(path: PathBuf, metadata: &fs::Metadata) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        Self {
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            path,
            extension,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Scan `dir` (non-recursive) for images with an allowed extension, newest
/// first. A missing directory is created and yields an empty list.
pub fn scan_directory(dir: &Path, extensions: &[String]) -> Result<Vec<WallpaperFile>> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        tracing::info!("created wallpaper directory {}", dir.display());
        return Ok(Vec::new());
    }

    let mut wallpapers: Vec<WallpaperFile> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !has_allowed_extension(&path, extensions) {
                return None;
            }
            // Follows symlinks, so a linked image counts as a regular file.
            let metadata = fs::metadata(&path).ok()?;
            metadata
                .is_file()
                .then(|| WallpaperFile::from_entry(path, &metadata))
        })
        .collect();

    // Stable: equal mtimes keep directory order.
    wallpapers.sort_by(|a, b| b.modified.cmp(&a.modified));

    tracing::debug!("scanned {}: {} wallpapers", dir.display(), wallpapers.len());
    Ok(wallpapers)
}
