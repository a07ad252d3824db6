// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hard reset command arguments.

use clap::Args;

use super::target::TargetArgs;

/// Arguments for the `reset` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Expected URL of the remote; added or corrected before anything else.
    #[arg(long = "remote-url", value_name = "URL")]
    pub remote_url: Option<String>,

    /// Skips the backup tag of the current HEAD.
    #[arg(long = "no-backup")]
    pub no_backup: bool,

    /// Pushes all local tags once the remote has been cleaned up.
    #[arg(long = "push-tags")]
    pub push_tags: bool,

    /// Answers the confirmation prompt non-interactively; only `yes` proceeds.
    #[arg(long, value_name = "TOKEN")]
    pub confirm: Option<String>,
}
