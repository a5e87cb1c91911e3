use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Last successfully applied wallpaper, persisted as a single plain-text path
/// so the next session can resync colors without asking the daemon.
#[derive(Debug, Clone)]
pub struct BootCache {
    file: PathBuf,
}

impl BootCache {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Cached path, or `None` when the file is absent, unreadable, empty, or
    /// names a wallpaper that no longer exists.
    pub fn read(&self) -> Option<PathBuf> {
        let data = match fs::read_to_string(&self.file) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("no boot cache at {}: {}", self.file.display(), e);
                return None;
            }
        };

        let cached = data.trim();
        if cached.is_empty() {
            return None;
        }

        let path = PathBuf::from(cached);
        if path.exists() {
            Some(path)
        } else {
            tracing::debug!("discarding boot cache entry {}: file is gone", path.display());
            None
        }
    }

    pub fn write(&self, wallpaper: &Path) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.file, wallpaper.to_string_lossy().as_bytes())
            .with_context(|| format!("Failed to write {}", self.file.display()))?;
        Ok(())
    }
}
