use super::{Transition, WallpaperBackend};
use crate::process;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

const QUERY_TIMEOUT: Duration = Duration::from_secs(3);
const PGREP_TIMEOUT: Duration = Duration::from_secs(2);
// Added on top of the transition duration so a running transition is never cut short.
const APPLY_TIMEOUT_SLACK: Duration = Duration::from_secs(10);
const MAX_APPLY_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const DAEMON_STARTUP_DELAY: Duration = Duration::from_millis(500);

/// swww (`swww img` / `swww query`) backend.
#[derive(Debug, Clone)]
pub struct SwwwBackend {
    client: String,
    daemon: String,
}

impl SwwwBackend {
    pub const NAME: &'static str = "swww";

    pub fn new() -> Self {
        Self::with_commands("swww", "swww-daemon")
    }

    /// Use custom binary names (tests and wrapper scripts).
    pub fn with_commands(client: impl Into<String>, daemon: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            daemon: daemon.into(),
        }
    }

    fn apply_timeout(transition: &Transition) -> Duration {
        let secs = if transition.duration.is_finite() {
            transition.duration.max(0.0)
        } else {
            0.0
        };
        Duration::try_from_secs_f32(secs)
            .unwrap_or(Duration::MAX)
            .saturating_add(APPLY_TIMEOUT_SLACK)
            .min(MAX_APPLY_TIMEOUT)
    }

    fn img_command(&self, path: &Path, transition: &Transition) -> Command {
        let mut cmd = Command::new(&self.client);
        cmd.arg("img")
            .arg(path)
            .arg("--transition-type")
            .arg(transition.transition_type.as_str())
            .arg("--transition-duration")
            .arg(transition.duration.to_string())
            .arg("--transition-fps")
            .arg(transition.fps.to_string());
        cmd
    }
}

impl Default for SwwwBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the displayed image from `swww query` output.
///
/// Lines look like `eDP-1: 1920x1080, scale: 1, currently displaying: image: /a/b.png`
/// (older releases print just `... image: /a/b.png`). Outputs showing a plain
/// color have no `image:` field and are skipped.
pub(crate) fn parse_query_output(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .filter_map(|line| line.split_once("image:"))
        .map(|(_, rest)| rest.trim())
        .find(|path| !path.is_empty())
        .map(PathBuf::from)
}

impl WallpaperBackend for SwwwBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_daemon_running(&self) -> bool {
        process::succeeds(
            Command::new("pgrep").arg("-x").arg(&self.daemon),
            PGREP_TIMEOUT,
        )
    }

    fn start_daemon(&self) {
        let spawned = Command::new(&self.daemon)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn();

        match spawned {
            Ok(_) => {
                // Give it a moment to initialize
                std::thread::sleep(DAEMON_STARTUP_DELAY);
            }
            Err(e) => tracing::debug!("failed to start {}: {}", self.daemon, e),
        }
    }

    fn current_wallpaper(&self) -> Option<PathBuf> {
        let output =
            match process::run_with_timeout(Command::new(&self.client).arg("query"), QUERY_TIMEOUT)
            {
                Ok(output) => output,
                Err(e) => {
                    tracing::debug!("swww query failed: {e}");
                    return None;
                }
            };

        if !output.success() {
            tracing::debug!("swww query exited with {}", output.status);
            return None;
        }

        parse_query_output(&output.stdout)
    }

    fn set_wallpaper(&self, path: &Path, transition: &Transition) -> bool {
        let timeout = Self::apply_timeout(transition);
        match process::run_with_timeout(&mut self.img_command(path, transition), timeout) {
            Ok(output) if output.success() => {
                tracing::info!("swww applied {}", path.display());
                true
            }
            Ok(output) => {
                tracing::warn!(
                    "swww img failed for {}: {}",
                    path.display(),
                    output.stderr.trim()
                );
                false
            }
            Err(e) => {
                tracing::warn!("swww img failed for {}: {}", path.display(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TransitionType;

    #[test]
    fn parses_current_query_format() {
        let out = "eDP-1: 1920x1080, scale: 1, currently displaying: image: /home/u/Pictures/Wallpapers/a.png\n";
        assert_eq!(
            parse_query_output(out),
            Some(PathBuf::from("/home/u/Pictures/Wallpapers/a.png"))
        );
    }

    #[test]
    fn parses_legacy_query_format_and_takes_first_output() {
        let out = "DP-1: 2560x1440, scaled at 1, image: /w/first.jpg\nDP-2: 1920x1080, image: /w/second.jpg\n";
        assert_eq!(parse_query_output(out), Some(PathBuf::from("/w/first.jpg")));
    }

    #[test]
    fn color_only_outputs_yield_none() {
        let out = "eDP-1: 1920x1080, scale: 1, currently displaying: color: 000000\n";
        assert_eq!(parse_query_output(out), None);
        assert_eq!(parse_query_output(""), None);
        assert_eq!(parse_query_output("eDP-1: image:   \n"), None);
    }

    #[test]
    fn apply_timeout_scales_with_duration() {
        let short = Transition {
            duration: 0.5,
            ..Transition::default()
        };
        let long = Transition {
            duration: 30.0,
            ..Transition::default()
        };
        assert!(SwwwBackend::apply_timeout(&long) > SwwwBackend::apply_timeout(&short));
        assert!(SwwwBackend::apply_timeout(&long) >= Duration::from_secs(30));

        let broken = Transition {
            duration: f32::NAN,
            ..Transition::default()
        };
        assert_eq!(SwwwBackend::apply_timeout(&broken), APPLY_TIMEOUT_SLACK);
    }

    #[test]
    fn absurd_duration_is_capped() {
        let huge = Transition {
            duration: 1.0e30,
            ..Transition::default()
        };
        assert_eq!(SwwwBackend::apply_timeout(&huge), MAX_APPLY_TIMEOUT);
        let max = Transition {
            duration: f32::MAX,
            ..Transition::default()
        };
        assert_eq!(SwwwBackend::apply_timeout(&max), MAX_APPLY_TIMEOUT);
    }

    #[test]
    fn img_command_carries_transition_arguments() {
        let backend = SwwwBackend::new();
        let transition = Transition {
            transition_type: TransitionType::Wipe,
            duration: 1.5,
            fps: 60,
        };
        let cmd = backend.img_command(Path::new("/w/a.png"), &transition);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "img",
                "/w/a.png",
                "--transition-type",
                "wipe",
                "--transition-duration",
                "1.5",
                "--transition-fps",
                "60"
            ]
        );
    }

    #[test]
    fn missing_binaries_degrade_to_failure_results() {
        let backend = SwwwBackend::with_commands(
            "wallpick-missing-swww",
            "wallpick-missing-swww-daemon",
        );
        assert!(!backend.is_daemon_running());
        assert_eq!(backend.current_wallpaper(), None);
        assert!(!backend.set_wallpaper(Path::new("/w/a.png"), &Transition::default()));
        // Must not panic or block.
        backend.start_daemon();
    }
}
