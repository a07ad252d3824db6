// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitsweep using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitsweep [global options] <command>
//! sync  [REPO_DIR] [REMOTE] [MAIN_BRANCH]
//! reset [REPO_DIR] [REMOTE] [MAIN_BRANCH] [--remote-url URL] [--no-backup]
//!       [--push-tags] [--confirm TOKEN]
//! options
//! version
//! ```

pub mod global;
pub mod reset;
pub mod sync;
pub mod target;


use crate::cli::global::GlobalOptions;
use crate::cli::reset::ResetArgs;
use crate::cli::sync::SyncArgs;
use clap::{Parser, Subcommand};

/// Bulk git branch maintenance.
#[derive(Debug, Parser)]
#[command(
    name = "gitsweep",
    author,
    version,
    about = "Bulk git branch maintenance",
    long_about = "gitsweep Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  `gitsweep sync` commits outstanding work on every local branch,\n\
                  pushes each one and rebases main onto the remote.\n\
                  `gitsweep reset` replaces all history with a single commit on\n\
                  main and deletes every other branch, locally and remotely.",
    after_help = "CONFIG FILES:\n\n\
                  Only files given with --config are read, in order; later files\n\
                  override earlier ones and command-line flags override both."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the config files.
    Options,

    /// Commits and pushes every local branch, then reconciles main.
    Sync(SyncArgs),

    /// Collapses history into one commit on main and deletes all other branches.
    Reset(ResetArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
