use super::ColorGenerator;
use crate::app::ColorBackendConfig;
use crate::process;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const SESSION_WALLPAPER_KEY: &str = "wallpaperPath";
const COLORS_FILE: &str = "dms-colors.json";

/// DankMaterialShell / matugen palette generator.
#[derive(Debug, Clone)]
pub struct DmsColorGenerator {
    command: String,
    state_dir: PathBuf,
    config_dir: PathBuf,
    shell_dir: PathBuf,
    session_file: PathBuf,
}

impl DmsColorGenerator {
    pub const NAME: &'static str = "dms";

    pub fn from_config(cfg: &ColorBackendConfig) -> Self {
        Self {
            command: "dms".to_string(),
            state_dir: cfg.state_dir.clone(),
            config_dir: cfg.config_dir.clone(),
            shell_dir: cfg.shell_dir.clone(),
            session_file: cfg.session_file.clone(),
        }
    }

    /// Replace the `dms` binary (tests and wrapper scripts).
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    fn queue_command(&self, wallpaper: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(["matugen", "queue"])
            .arg("--state-dir")
            .arg(&self.state_dir)
            .arg("--config-dir")
            .arg(&self.config_dir)
            .arg("--shell-dir")
            .arg(&self.shell_dir)
            .arg("--value")
            .arg(wallpaper);
        cmd
    }

    fn read_session(&self) -> Result<serde_json::Map<String, Value>> {
        let data = fs::read_to_string(&self.session_file)
            .with_context(|| format!("Failed to read {}", self.session_file.display()))?;
        match serde_json::from_str::<Value>(&data)
            .with_context(|| format!("Failed to parse {}", self.session_file.display()))?
        {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("{} is not a JSON object", self.session_file.display()),
        }
    }

    fn write_session(&self, wallpaper: &Path) -> Result<()> {
        let mut session = self.read_session()?;
        session.insert(
            SESSION_WALLPAPER_KEY.to_string(),
            Value::String(wallpaper.to_string_lossy().into_owned()),
        );
        let data = serde_json::to_string_pretty(&Value::Object(session))?;
        fs::write(&self.session_file, data)
            .with_context(|| format!("Failed to write {}", self.session_file.display()))?;
        Ok(())
    }
}

impl ColorGenerator for DmsColorGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate(&self, wallpaper: &Path) -> bool {
        match process::run_with_timeout(&mut self.queue_command(wallpaper), GENERATE_TIMEOUT) {
            Ok(output) if output.success() => {
                tracing::info!("queued palette generation for {}", wallpaper.display());
                true
            }
            Ok(output) => {
                tracing::warn!(
                    "dms matugen exited with {}: {}",
                    output.status,
                    output.stderr.trim()
                );
                false
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("{} command not found, skipping color generation", self.command);
                false
            }
            Err(e) => {
                tracing::warn!("color generation failed: {e}");
                false
            }
        }
    }

    fn update_session(&self, wallpaper: &Path) -> bool {
        if !self.session_file.exists() {
            tracing::debug!(
                "session file {} absent, not creating it",
                self.session_file.display()
            );
            return false;
        }
        match self.write_session(wallpaper) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to update DMS session: {e:#}");
                false
            }
        }
    }

    fn colors_path(&self) -> PathBuf {
        self.state_dir.join(COLORS_FILE)
    }

    fn is_cached(&self, wallpaper: &Path) -> bool {
        if !self.colors_path().exists() {
            return false;
        }
        let Ok(session) = self.read_session() else {
            return false;
        };
        let expected = wallpaper.to_string_lossy();
        session.get(SESSION_WALLPAPER_KEY).and_then(Value::as_str) == Some(&*expected)
    }
}
