// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hard reset command implementation.

use anyhow::{Context, bail};

use super::{join_or_none, validate_target, warning_lines};
use crate::cli::reset::ResetArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::{DryRun, GitRepository};
use crate::workflow::confirm::{Confirm, PresetConfirm, StdinConfirm};
use crate::workflow::reset::{
    RemoteChange, ResetOptions, ResetReport, push_rejected_guidance, run_reset,
};
use crate::workflow::{Operation, Timestamp};

/// Flags override config, config overrides defaults.
///
/// # Errors
///
/// Returns an error if the resolved remote or main branch is not a usable
/// git name.
pub fn resolve_reset_options(args: &ResetArgs, config: &Config) -> Result<ResetOptions> {
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

    Ok(ResetOptions::builder()
        .with_remote(remote)
        .with_main_branch(main_branch)
        .maybe_with_remote_url(
            args.remote_url
                .clone()
                .or_else(|| config.reset.remote_url.clone()),
        )
        .with_backup(config.reset.backup && !args.no_backup)
        .with_backup_tag_prefix(config.reset.backup_tag_prefix.clone())
        .with_push_tags(config.reset.push_tags || args.push_tags)
        .build())
}

/// Main handler for the reset command.
///
/// # Errors
///
/// Returns an error if a name is invalid, the target is not a git
/// repository, the operator did not confirm, or a step after confirmation
/// failed fatally.
pub fn run_reset_command(args: &ResetArgs, config: &Config, dry_run: bool) -> Result<()> {
    let options = resolve_reset_options(args, config)?;
    let repo = GitRepository::new(args.target.repo_dir());
    let timestamp = Timestamp::now();
    let mut confirm: Box<dyn Confirm> = match &args.confirm {
        Some(token) => Box::new(PresetConfirm(Some(token.clone()))),
        None => Box::new(StdinConfirm),
    };

    let report = if dry_run {
        run_reset(&DryRun::new(repo), &options, &timestamp, confirm.as_mut())
    } else {
        run_reset(&repo, &options, &timestamp, confirm.as_mut())
    }
    .context("hard reset not started")?;

    for line in reset_summary(&report) {
        println!("{line}");
    }

    if let Some(failure) = report.aborted() {
        if failure.operation == Operation::ForcePush {
            eprintln!("{}", push_rejected_guidance(&options));
        }
        eprintln!("{}", report.rollback_instructions(&options));
        bail!("hard reset aborted: {failure}");
    }

    println!("{}", report.rollback_instructions(&options));
    Ok(())
}

/// Human-readable outcome of a reset run.
#[must_use]
pub fn reset_summary(report: &ResetReport) -> Vec<String> {
    let mut lines = Vec::new();
    match &report.remote_change {
        Some(RemoteChange::Added) => lines.push("Remote:         added".to_string()),
        Some(RemoteChange::Updated { previous }) => {
            lines.push(format!("Remote:         updated (was {previous})"));
        }
        Some(RemoteChange::Unchanged) | None => {}
    }
    lines.push(format!(
        "Backup tag:     {}",
        report.backup.as_ref().map_or("none", |t| t.name.as_str())
    ));
    lines.push(format!(
        "Deleted local:  {}",
        join_or_none(&report.deleted_local)
    ));
    if let Some(root) = &report.new_root {
        lines.push(format!("New root:       {root}"));
    }
    lines.push(format!(
        "Force-pushed:   {}",
        if report.force_pushed { "yes" } else { "no" }
    ));
    lines.push(format!(
        "Deleted remote: {}",
        join_or_none(&report.deleted_remote)
    ));
    lines.extend(warning_lines(&report.steps));
    lines
}
