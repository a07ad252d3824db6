// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!                                  Sync | Reset | Options | Version
//! ```

use std::io::IsTerminal;
use std::process::ExitCode;

use gitsweep::cli::global::GlobalOptions;
use gitsweep::cli::{self, Command};
use gitsweep::cmd::config::{load_config, run_options_command};
use gitsweep::cmd::reset::run_reset_command;
use gitsweep::cmd::sync::run_sync_command;
use gitsweep::config::Config;
use gitsweep::logging::init_logging;
use gitsweep::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let config = match &cli.command {
        Some(Command::Sync(_) | Command::Reset(_)) => match load_config(&cli.global) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {e:#}");
                return ExitCode::FAILURE;
            }
        },
        _ => Config::default(),
    };

    let log_config = build_log_config(&cli.global, &config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config)
}

fn build_log_config(global: &GlobalOptions, config: &Config) -> LogConfig {
    let configured = &config.global;
    let console_level = LogLevel::from_u8(global.console_level(configured.output_log_level.as_u8()))
        .unwrap_or(LogLevel::INFO);
    let file_level = LogLevel::from_u8(global.file_level(configured.file_log_level.as_u8()))
        .unwrap_or(console_level);
    let log_file = global
        .log_file
        .as_ref()
        .or(config.global.log_file.as_ref())
        .map(|p| p.display().to_string());

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file)
        .with_ansi(std::io::stderr().is_terminal())
        .build()
}

fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => run_options_command(&cli.global),
        Some(Command::Sync(args)) => run_sync_command(args, config, cli.global.dry),
        Some(Command::Reset(args)) => run_reset_command(args, config, cli.global.dry),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
