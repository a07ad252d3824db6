// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch sync command implementation.

use anyhow::Context;

use super::{join_or_none, validate_target, warning_lines};
use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::{DryRun, GitRepository};
use crate::workflow::Timestamp;
use crate::workflow::sync::{MainSource, SyncOptions, SyncReport, run_sync};

/// Positionals override config, config overrides defaults.
///
/// # Errors
///
/// Returns an error if the resolved remote or main branch is not a usable
/// git name.
pub fn resolve_sync_options(args: &SyncArgs, config: &Config) -> Result<SyncOptions> {
    let remote = args
        .target
        .remote
        .clone()
        .unwrap_or_else(|| config.repo.remote.clone());
    let main_branch = args
        .target
        .main_branch
        .clone()
        .unwrap_or_else(|| config.repo.main_branch.clone());
    validate_target(&remote, &main_branch)?;

    Ok(SyncOptions::builder()
        .with_remote(remote)
        .with_main_branch(main_branch)
        .build())
}

/// Main handler for the sync command.
///
/// # Errors
///
/// Returns an error if the remote or main branch name is invalid, or the
/// target is not a git repository.
pub fn run_sync_command(args: &SyncArgs, config: &Config, dry_run: bool) -> Result<()> {
    let options = resolve_sync_options(args, config)?;
    let repo = GitRepository::new(args.target.repo_dir());
    let timestamp = Timestamp::now();

    let report = if dry_run {
        run_sync(&DryRun::new(repo), &options, &timestamp)
    } else {
        run_sync(&repo, &options, &timestamp)
    }
    .context("branch sync failed")?;

    for line in sync_summary(&report, &options) {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable outcome of a sync run.
#[must_use]
pub fn sync_summary(report: &SyncReport, options: &SyncOptions) -> Vec<String> {
    let main = &options.main_branch;
    let mut lines = vec![
        format!("Branches:  {}", join_or_none(&report.plan)),
        format!("Committed: {}", join_or_none(&report.committed)),
        format!("Pushed:    {}", join_or_none(&report.pushed)),
    ];
    let main_state = match report.main_source {
        None => format!("{main} could not be created"),
        Some(source) => {
            let origin = match source {
                MainSource::Existing => "",
                MainSource::Remote => " (created from remote)",
                MainSource::Placeholder => " (created at HEAD)",
            };
            format!(
                "{main}{origin}: {}, {}",
                if report.main_rebased {
                    "rebased"
                } else {
                    "not rebased"
                },
                if report.main_pushed {
                    "pushed"
                } else {
                    "not pushed"
                }
            )
        }
    };
    lines.push(format!("Main:      {main_state}"));
    if !report.restored {
        lines.push(format!(
            "Could not return to {}; check it out manually.",
            report.original
        ));
    }
    lines.extend(warning_lines(&report.steps));
    lines
}
