use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use super::{Cli, Commands};
use crate::app::Config;
use crate::cli_cmds::*;
use crate::logging::{self, LogTarget};
use crate::utils::expand_tilde;

pub(crate) fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // The picker owns the terminal, so its logs go to a file.
    let log_file = Config::log_file();
    let target = if cli.command.is_none() {
        LogTarget::File(&log_file)
    } else {
        LogTarget::Stderr
    };
    logging::init(target, cli.verbose)?;

    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(dir) = cli.dir {
        config.wallpaper.directory = expand_tilde(&dir);
    }

    match cli.command {
        Some(Commands::List) => {
            let manager = build_manager(&config, false)?;
            cmd_list(&manager);
        }
        Some(Commands::Set { path }) => {
            let mut manager = build_manager(&config, true)?;
            cmd_set(&mut manager, &path)?;
        }
        Some(Commands::Current) => {
            let manager = build_manager(&config, false)?;
            cmd_current(&manager);
        }
        Some(Commands::Sync) => {
            return cmd_sync(&config);
        }
        Some(Commands::Thumbs { blocking }) => {
            let manager = build_manager(&config, false)?;
            cmd_thumbs(&config, &manager, blocking);
        }
        Some(Commands::Backends) => {
            cmd_backends();
        }
        None => {
            return cmd_pick(config);
        }
    }

    Ok(ExitCode::SUCCESS)
}
