use super::{App, PrewarmState};
use crate::wallpaper::{ApplyReport, ColorStep};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

impl App {
    /// Apply the selected wallpaper and report the outcome in the status line.
    pub fn apply_selected(&mut self) {
        let Some(path) = self.selected_wallpaper().map(|wp| wp.path.clone()) else {
            return;
        };

        let message = match self.manager.set_wallpaper(&path) {
            Ok(report) => describe_apply(&path, report),
            Err(e) => format!("Failed: {}", e),
        };
        self.ui.status_message = Some(message);
    }

    /// Rebuild the collection from disk, keeping the cursor on the same file.
    pub fn rescan(&mut self) {
        let keep = self.selected_wallpaper().map(|wp| wp.path.clone());

        if let Err(e) = self.manager.reload() {
            self.ui.status_message = Some(format!("Rescan failed: {:#}", e));
            return;
        }

        self.selected = keep
            .and_then(|path| self.manager.position_of(&path))
            .unwrap_or(0);
        self.clamp_selection();
        self.ui.status_message = Some(format!(
            "Found {} wallpapers",
            self.manager.wallpapers().len()
        ));
        self.start_prewarm();
    }

    /// Queue background generation of every stale thumbnail. While a
    /// previous pre-warm is still running, another pass is queued to start
    /// when it finishes.
    pub fn start_prewarm(&mut self) {
        if !self.scheduler.is_idle() {
            self.prewarm.rerun = true;
            return;
        }

        let paths: Vec<PathBuf> = self
            .manager
            .wallpapers()
            .iter()
            .map(|wp| wp.path.clone())
            .collect();

        let finished = Rc::new(Cell::new(None));
        self.prewarm = PrewarmState {
            total: self.thumbnails.stale_paths(&paths).len(),
            ticks: 0,
            rerun: false,
            finished: finished.clone(),
        };
        self.thumbnails
            .ensure_thumbnails_async(&paths, &mut self.scheduler, move |summary| {
                finished.set(Some(summary));
            });
    }

    /// Run one unit of background work. Returns true if anything ran.
    pub fn tick_background(&mut self) -> bool {
        if !self.scheduler.run_once() {
            return false;
        }
        self.prewarm.ticks += 1;
        if self.prewarm.rerun && self.scheduler.is_idle() {
            self.start_prewarm();
        }
        true
    }

    /// Pre-warm progress for the status line.
    pub fn prewarm_status(&self) -> Option<String> {
        match self.prewarm.finished.get() {
            Some(summary) if summary.failed > 0 => Some(format!(
                "thumbnails: {} ready, {} failed",
                summary.generated, summary.failed
            )),
            Some(_) => None,
            None if self.prewarm.total > 0 => Some(format!(
                "thumbnails {}/{}",
                self.prewarm.ticks.min(self.prewarm.total),
                self.prewarm.total
            )),
            None => None,
        }
    }
}

fn describe_apply(path: &Path, report: ApplyReport) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let colors = match report.colors {
        ColorStep::Generated => ", colors updated",
        ColorStep::Failed => ", color generation failed",
        ColorStep::Skipped => "",
    };
    let cache = if report.boot_cached {
        ""
    } else {
        " (boot cache not saved)"
    };
    format!("Applied {}{}{}", name, colors, cache)
}
