// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch sync command arguments.

use clap::Args;

use super::target::TargetArgs;

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}
