// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Positional arguments naming the repository both workflows act on.

use clap::Args;
use std::path::PathBuf;

/// Repository, remote and main branch; unset values come from config.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Repository work tree [default: .]
    #[arg(value_name = "REPO_DIR")]
    pub repo_dir: Option<PathBuf>,

    /// Remote to push to [default: origin]
    #[arg(value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Name of the main branch [default: main]
    #[arg(value_name = "MAIN_BRANCH")]
    pub main_branch: Option<String>,
}

impl TargetArgs {
    /// Work tree path, `.` when not given.
    #[must_use]
    pub fn repo_dir(&self) -> PathBuf {
        self.repo_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
