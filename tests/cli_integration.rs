use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn wallpick() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wallpick"))
}

/// Scratch home: a config file, a wallpaper dir and a private state dir.
struct Sandbox {
    tmp: TempDir,
}

impl Sandbox {
    fn new(extra_config: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("walls")).unwrap();
        let config = format!(
            "[wallpaper]\ndirectory = \"{}\"\n{}",
            tmp.path().join("walls").display(),
            extra_config
        );
        fs::write(tmp.path().join("config.toml"), config).unwrap();
        Self { tmp }
    }

    fn walls(&self) -> PathBuf {
        self.tmp.path().join("walls")
    }

    fn run(&self, args: &[&str]) -> Output {
        wallpick()
            .arg("--config")
            .arg(self.tmp.path().join("config.toml"))
            .args(args)
            .env("XDG_STATE_HOME", self.tmp.path().join("state"))
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run")
    }
}

fn write_png(path: &Path, modified: SystemTime) {
    let img = image::RgbImage::from_fn(10, 10, |_, _| image::Rgb([255, 0, 0]));
    img.save(path).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

#[test]
fn test_help_exits_zero() {
    let output = wallpick().arg("--help").output().expect("failed to run");
    assert!(output.status.success(), "wallpick --help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Wallpaper picker"),
        "help should contain description"
    );
    assert!(stdout.contains("sync"), "help should list subcommands");
}

#[test]
fn test_version_exits_zero() {
    let output = wallpick().arg("--version").output().expect("failed to run");
    assert!(output.status.success(), "wallpick --version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("wallpick"),
        "version output should contain crate name"
    );
}

#[test]
fn test_list_with_empty_dir() {
    let sandbox = Sandbox::new("");
    let output = sandbox.run(&["list"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(!stderr.contains("panicked"), "should not panic on empty dir");
    assert!(stderr.contains("No wallpapers found"));
}

#[test]
fn test_list_with_nonexistent_dir_creates_it() {
    let sandbox = Sandbox::new("");
    let missing = sandbox.tmp.path().join("not/yet/there");
    let output = sandbox.run(&["list", "-d", missing.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(missing.is_dir());
}

#[test]
fn test_list_is_newest_first() {
    let sandbox = Sandbox::new("");
    let t = SystemTime::now() - Duration::from_secs(600);
    write_png(&sandbox.walls().join("a.png"), t);
    write_png(&sandbox.walls().join("b.png"), t + Duration::from_secs(60));
    fs::write(sandbox.walls().join("notes.txt"), "skip me").unwrap();

    let output = sandbox.run(&["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.rsplit('/').next())
        .collect();
    assert_eq!(names, vec!["b.png", "a.png"]);
}

#[test]
fn test_first_run_writes_default_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("fresh/config.toml");
    let output = wallpick()
        .arg("--config")
        .arg(&config)
        .arg("backends")
        .env("XDG_STATE_HOME", tmp.path().join("state"))
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("[wallpaper.backend]"));
    assert!(written.contains("[colors.backend]"));
}

#[test]
fn test_backends_lists_builtins() {
    let sandbox = Sandbox::new("");
    let output = sandbox.run(&["backends"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wallpaper backends: swww"));
    assert!(stdout.contains("color backends: dms"));
}

#[test]
fn test_unknown_backend_is_a_configuration_error() {
    let sandbox = Sandbox::new("[wallpaper.backend]\nname = \"hyprpaper\"\n");
    let output = sandbox.run(&["list"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown wallpaper backend 'hyprpaper'"));
    assert!(stderr.contains("swww"));
}

#[test]
fn test_sync_with_colors_disabled_succeeds() {
    let sandbox = Sandbox::new("[colors]\nenabled = false\n");
    let output = sandbox.run(&["sync"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Color generation disabled"));
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[wallpaper\n").unwrap();

    let output = wallpick()
        .arg("--config")
        .arg(&config)
        .arg("backends")
        .env("XDG_STATE_HOME", tmp.path().join("state"))
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config"));
    assert_eq!(fs::read_to_string(&config).unwrap(), "[wallpaper\n");
}
