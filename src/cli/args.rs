use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wallpick")]
#[command(version)]
#[command(about = "Wallpaper picker with palette sync for Wayland")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Config file (default: ~/.config/wallpick/config.toml)
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Wallpaper directory (overrides the config)
    #[arg(short, long, global = true)]
    pub(crate) dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List wallpapers, newest first (* marks the current one)
    List,
    /// Apply a wallpaper and regenerate colors
    Set {
        /// Path to the image
        path: PathBuf,
    },
    /// Print the current wallpaper
    Current,
    /// Resync colors with the current wallpaper (run at login)
    Sync,
    /// Generate missing or stale thumbnails
    Thumbs {
        /// Generate everything in one pass instead of one image per scheduler tick
        #[arg(long)]
        blocking: bool,
    },
    /// List available wallpaper and color backends
    Backends,
}
