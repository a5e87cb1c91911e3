mod app;
mod backend;
mod boot_cache;
mod cli;
mod cli_cmds;
mod colors;
mod instance;
mod logging;
mod process;
mod registry;
mod scheduler;
mod sync;
mod thumbnail;
mod ui;
mod utils;
mod wallpaper;

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    cli::run()
}
