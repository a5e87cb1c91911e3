use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Result of trying to become the one running picker.
pub enum Launch {
    /// We are the picker now; keep the guard alive until exit.
    Acquired(InstanceGuard),
    /// Another picker was running and has been asked to close.
    Toggled(u32),
}

/// Default PID file location.
pub fn pid_file() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("wallpick.pid")
}

/// Only positive ids name a single process; 0 and negatives address groups.
fn as_pid(pid: u32) -> Option<libc::pid_t> {
    libc::pid_t::try_from(pid).ok().filter(|&pid| pid > 0)
}

/// Signal 0 checks existence without delivering anything. EPERM still means
/// the process exists.
fn is_alive(pid: u32) -> bool {
    let Some(pid) = as_pid(pid) else {
        return false;
    };
    let rc = unsafe { libc::kill(pid, 0) };
    rc == 0 || io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

fn terminate(pid: u32) -> bool {
    let Some(pid) = as_pid(pid) else {
        return false;
    };
    unsafe { libc::kill(pid, libc::SIGTERM) == 0 }
}

/// PID recorded in `file` if that process still exists. Stale or garbled
/// files are removed.
pub fn live_pid(file: &Path) -> Option<u32> {
    let data = fs::read_to_string(file).ok()?;
    match data.trim().parse::<u32>() {
        Ok(pid) if is_alive(pid) => Some(pid),
        _ => {
            tracing::debug!("removing stale pid file {}", file.display());
            let _ = fs::remove_file(file);
            None
        }
    }
}

/// Close a running picker, or claim the PID file for this process.
pub fn acquire_or_toggle(file: &Path) -> Result<Launch> {
    if let Some(pid) = live_pid(file) {
        tracing::info!("picker already running as pid {}, closing it", pid);
        if !terminate(pid) {
            tracing::warn!("could not signal pid {}: {}", pid, io::Error::last_os_error());
        }
        let _ = fs::remove_file(file);
        return Ok(Launch::Toggled(pid));
    }

    InstanceGuard::acquire(file).map(Launch::Acquired)
}

/// Holds the PID file; removes it on drop if it still names us.
#[derive(Debug)]
pub struct InstanceGuard {
    file: PathBuf,
    pid: u32,
}

impl InstanceGuard {
    fn acquire(file: &Path) -> Result<Self> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let pid = std::process::id();
        fs::write(file, pid.to_string())
            .with_context(|| format!("Failed to write pid file {}", file.display()))?;
        Ok(Self {
            file: file.to_path_buf(),
            pid,
        })
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        let ours = fs::read_to_string(&self.file)
            .ok()
            .and_then(|data| data.trim().parse::<u32>().ok())
            == Some(self.pid);
        if ours {
            let _ = fs::remove_file(&self.file);
        }
    }
}
