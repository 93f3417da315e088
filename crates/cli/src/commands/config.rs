// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::cli::ConfigCommand;
use crate::config::{config_path, Config};
use crate::error::Result;

use super::load_config;

/// Execute a config subcommand.
pub fn run(cmd: ConfigCommand, config: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = load_config(config)?;
            print!("{}", render(&config)?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", resolve_path(config)?.display());
            Ok(())
        }
    }
}

pub(crate) fn render(config: &Config) -> Result<String> {
    let mut text = config.to_toml()?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

pub(crate) fn resolve_path(config: Option<&Path>) -> Result<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => config_path(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
