use crate::scheduler::{IdleScheduler, Tick};
use anyhow::{Context, Result};
use fast_image_resize::{images::Image, ResizeOptions, Resizer};
use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Preview width in pixels; height follows the source aspect ratio.
pub const DEFAULT_THUMB_WIDTH: u32 = 200;

/// Outcome of a pre-warm pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrewarmSummary {
    pub generated: usize,
    pub failed: usize,
}

/// On-disk preview store keyed by a hash of the absolute source path.
///
/// An entry is valid while it is at least as new as its source; anything
/// older is regenerated on the next access. Entries are never deleted.
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    cache_dir: PathBuf,
    width: u32,
}

impl ThumbnailCache {
    pub fn new(cache_dir: impl Into<PathBuf>, width: u32) -> Self {
        let cache_dir = cache_dir.into();
        if let Err(e) = fs::create_dir_all(&cache_dir) {
            tracing::warn!(
                "failed to create thumbnail directory {}: {}",
                cache_dir.display(),
                e
            );
        }
        Self {
            cache_dir,
            width: width.max(1),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Deterministic cache location for `source`. Depends on the path only,
    /// never on the file contents.
    pub fn thumbnail_path(&self, source: &Path) -> PathBuf {
        let absolute = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
        let digest = Sha256::digest(absolute.to_string_lossy().as_bytes());
        self.cache_dir.join(format!("{:x}.png", digest))
    }

    /// True when a thumbnail exists and is not older than its source.
    pub fn is_valid(&self, source: &Path) -> bool {
        Self::is_fresh(&self.thumbnail_path(source), source)
    }

    fn is_fresh(thumb: &Path, source: &Path) -> bool {
        let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified()).ok();
        match (modified(thumb), modified(source)) {
            (Some(thumb_mtime), Some(source_mtime)) => thumb_mtime >= source_mtime,
            _ => false,
        }
    }

    /// Return a valid thumbnail for `source`, generating it synchronously if
    /// needed. `None` when the source cannot be decoded or the preview cannot
    /// be written.
    pub fn get_thumbnail(&self, source: &Path) -> Option<PathBuf> {
        let thumb = self.thumbnail_path(source);
        if Self::is_fresh(&thumb, source) {
            return Some(thumb);
        }
        self.generate_logged(source, &thumb).then_some(thumb)
    }

    /// Sources among `paths` whose thumbnail is missing or stale, in input order.
    pub fn stale_paths(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|p| !self.is_valid(p))
            .cloned()
            .collect()
    }

    /// Generate every missing or stale thumbnail now.
    pub fn ensure_thumbnails(&self, paths: &[PathBuf]) -> PrewarmSummary {
        let mut summary = PrewarmSummary::default();
        for source in self.stale_paths(paths) {
            let thumb = self.thumbnail_path(&source);
            if self.generate_logged(&source, &thumb) {
                summary.generated += 1;
            } else {
                summary.failed += 1;
            }
        }
        summary
    }

    /// Queue generation of every missing or stale thumbnail on `scheduler`,
    /// one image per tick, then call `on_complete` once.
    ///
    /// The stale list is computed up front. When it is empty `on_complete`
    /// runs before this returns and the scheduler is left untouched.
    pub fn ensure_thumbnails_async<F>(
        &self,
        paths: &[PathBuf],
        scheduler: &mut IdleScheduler,
        on_complete: F,
    ) where
        F: FnOnce(PrewarmSummary) + 'static,
    {
        let pending: VecDeque<PathBuf> = self.stale_paths(paths).into();
        if pending.is_empty() {
            on_complete(PrewarmSummary::default());
            return;
        }

        tracing::debug!("queued {} thumbnails for background generation", pending.len());
        let mut task = PrewarmTask {
            cache: self.clone(),
            pending,
            summary: PrewarmSummary::default(),
            on_complete: Some(Box::new(on_complete)),
        };
        scheduler.spawn(move || task.step());
    }

    fn generate_logged(&self, source: &Path, thumb: &Path) -> bool {
        match self.generate(source, thumb) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("thumbnail failed for {}: {:#}", source.display(), e);
                false
            }
        }
    }

    fn generate(&self, source: &Path, thumb: &Path) -> Result<()> {
        let image = Self::build_thumbnail_image(source, self.width)?;

        // Write beside the target and rename so a half-written file never looks valid.
        let partial = thumb.with_extension("png.part");
        let written = image
            .save_with_format(&partial, image::ImageFormat::Png)
            .with_context(|| format!("Failed to encode PNG: {}", partial.display()))
            .and_then(|()| {
                fs::rename(&partial, thumb).with_context(|| {
                    format!("Failed to move thumbnail into {}", thumb.display())
                })
            });
        if written.is_err() {
            let _ = fs::remove_file(&partial);
        }
        written
    }

    /// Height for a `width`-wide copy of a `src_w`×`src_h` image.
    fn scaled_height(src_w: u32, src_h: u32, width: u32) -> u32 {
        if src_w == 0 || src_h == 0 {
            return 1;
        }
        let height = (f64::from(width) * f64::from(src_h) / f64::from(src_w)).round() as u32;
        height.max(1)
    }

    fn build_thumbnail_image(source: &Path, width: u32) -> Result<RgbaImage> {
        let src_image = image::open(source)
            .with_context(|| format!("Failed to open image: {}", source.display()))?;

        let src_rgba = src_image.to_rgba8();
        let (src_width, src_height) = (src_rgba.width(), src_rgba.height());
        let dst_height = Self::scaled_height(src_width, src_height, width);

        let src_fir = Image::from_vec_u8(
            src_width,
            src_height,
            src_rgba.into_raw(),
            fast_image_resize::PixelType::U8x4,
        )?;

        let mut dst_fir = Image::new(width, dst_height, fast_image_resize::PixelType::U8x4);

        let mut resizer = Resizer::new();
        resizer.resize(
            &src_fir,
            &mut dst_fir,
            &ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
                fast_image_resize::FilterType::Bilinear,
            )),
        )?;

        RgbaImage::from_raw(width, dst_height, dst_fir.into_vec())
            .context("Failed to create output image")
    }
}

/// Background pre-warm: one thumbnail per scheduler tick.
struct PrewarmTask {
    cache: ThumbnailCache,
    pending: VecDeque<PathBuf>,
    summary: PrewarmSummary,
    on_complete: Option<Box<dyn FnOnce(PrewarmSummary)>>,
}

impl PrewarmTask {
    fn step(&mut self) -> Tick {
        if let Some(source) = self.pending.pop_front() {
            let thumb = self.cache.thumbnail_path(&source);
            if self.cache.generate_logged(&source, &thumb) {
                self.summary.generated += 1;
            } else {
                self.summary.failed += 1;
            }
        }

        if !self.pending.is_empty() {
            return Tick::Continue;
        }
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(self.summary);
        }
        Tick::Done
    }
}
