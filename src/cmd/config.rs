// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for gitsweep.

use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::config::loader::ConfigLoader;
use crate::error::{ConfigError, Result};

/// Loader for every `--config` file, in the order given.
#[must_use]
pub fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    global
        .configs
        .iter()
        .fold(ConfigLoader::new(), |loader, path| loader.add_toml_file(path))
}

/// Load and validate the configuration named on the command line.
///
/// # Errors
///
/// Returns an error if a config file is missing, malformed or invalid.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    ensure_config_files_exist(global)?;
    build_config_loader(global).build()
}

fn ensure_config_files_exist(global: &GlobalOptions) -> Result<()> {
    match global.configs.iter().find(|p| !p.is_file()) {
        Some(missing) => Err(ConfigError::NotFound(missing.display().to_string()).into()),
        None => Ok(()),
    }
}

/// Display the loaded config files and the effective options.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run_options_command(global: &GlobalOptions) -> Result<()> {
    ensure_config_files_exist(global)?;
    let loader = build_config_loader(global);
    let files = loader.format_loaded_files();
    let config = loader.build()?;

    if files.is_empty() {
        println!("No configuration files loaded, showing defaults");
    } else {
        for line in files {
            println!("{line}");
        }
    }
    println!();
    for line in config.format_options() {
        println!("{line}");
    }
    Ok(())
}
