// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hard Reset: collapse history into one fresh commit on main.
//!
//! ```text
//!   validate, confirm ("yes") ........... fatal, nothing touched
//!   reconcile remote URL (optional) ..... fatal
//!   fetch --prune ....................... warn
//!   tag HEAD <prefix>-<ts>, push tag .... warn
//!   commit final WIP .................... warn
//!   HEAD has a commit? .................. fatal
//!   main := HEAD, checkout main ......... fatal
//!   delete other local branches ......... warn (each)
//!   orphan fresh-start-<ts>             \
//!   add -A, commit "feat: fresh start"   | fatal
//!   delete main, rename -> main         /
//!   push --force main ................... fatal, remote left alone
//!   delete other remote branches ........ warn (each)
//!   push --tags (optional) .............. warn
//! ```
//!
//! Past the rewrite there is no way back except the backup tag; the
//! report carries enough to print rollback instructions.

use bon::Builder;
use tracing::info;

use super::confirm::{CONFIRM_TOKEN, Confirm, require_confirmation};
use super::{
    Operation, StepFailure, StepLog, StepOutcome, Timestamp, backup_tag_name, commit_wip,
    ensure_repository, final_wip_message, fresh_start_message,
};
use crate::error::{SweepResult, bail_out};
use crate::git::backend::{CurrentRef, PushOptions, Repository};

/// Default prefix of the backup tag.
pub const BACKUP_TAG_PREFIX: &str = "pre-reset-backup";

/// Inputs of a Hard Reset run.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ResetOptions {
    #[builder(setters(name = with_remote), into, default = String::from("origin"))]
    pub remote: String,
    #[builder(setters(name = with_main_branch), into, default = String::from("main"))]
    pub main_branch: String,
    /// Expected URL of `remote`; the remote is added or corrected to match.
    #[builder(setters(name = with_remote_url), into)]
    pub remote_url: Option<String>,
    #[builder(setters(name = with_backup), default = true)]
    pub backup: bool,
    #[builder(setters(name = with_backup_tag_prefix), into, default = String::from(BACKUP_TAG_PREFIX))]
    pub backup_tag_prefix: String,
    #[builder(setters(name = with_push_tags), default = false)]
    pub push_tags: bool,
}

impl Default for ResetOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Effect of remote URL reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteChange {
    Added,
    Updated { previous: String },
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTag {
    pub name: String,
    /// HEAD before the final WIP commit.
    pub commit: String,
    pub pushed: bool,
}

/// What a Hard Reset run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub remote_change: Option<RemoteChange>,
    pub backup: Option<BackupTag>,
    pub final_wip: bool,
    pub deleted_local: Vec<String>,
    /// The single commit main now consists of.
    pub new_root: Option<String>,
    pub force_pushed: bool,
    pub deleted_remote: Vec<String>,
    pub tags_pushed: bool,
    pub steps: StepLog,
}

impl ResetReport {
    /// The step that stopped the run, if any.
    #[must_use]
    pub const fn aborted(&self) -> Option<&StepFailure> {
        self.steps.fatal()
    }

    /// Commands that bring the previous history back.
    #[must_use]
    pub fn rollback_instructions(&self, options: &ResetOptions) -> String {
        let main = &options.main_branch;
        let remote = &options.remote;
        match &self.backup {
            Some(tag) => format!(
                "To restore the previous history:\n  \
                 git checkout -B {main} {name}\n  \
                 git push --force {remote} {main}\n\
                 Backup tag {name} points at {commit}{pushed}.",
                name = tag.name,
                commit = tag.commit,
                pushed = if tag.pushed {
                    format!(" and exists on {remote}")
                } else {
                    " (local only)".to_string()
                },
            ),
            None => "No backup tag was created; the previous history cannot be restored from this run."
                .to_string(),
        }
    }
}

/// Shown when the remote refuses the rewritten main.
#[must_use]
pub fn push_rejected_guidance(options: &ResetOptions) -> String {
    let main = &options.main_branch;
    let remote = &options.remote;
    format!(
        "{remote} rejected the rewritten {main}; remote branches were left untouched.\n\
         If {main} is protected, allow force pushes for it on the hosting service, then run:\n  \
         git push --force --set-upstream {remote} {main}"
    )
}

fn confirmation_prompt(options: &ResetOptions) -> String {
    format!(
        "This replaces the history of {main} with a single commit, force-pushes it to {remote} \
         and deletes every other branch locally and on {remote}.\n\
         Type '{CONFIRM_TOKEN}' to continue: ",
        main = options.main_branch,
        remote = options.remote,
    )
}

/// Run Hard Reset against `repo`.
///
/// A fatal step after confirmation does not return an error: the run stops
/// and the report's [`ResetReport::aborted`] names the step.
///
/// # Errors
///
/// Returns an error if `repo` is not a repository, or
/// [`crate::error::SweepError::Declined`] if the operator does not confirm.
/// Nothing is modified in either case.
pub fn run_reset<R, C>(
    repo: &R,
    options: &ResetOptions,
    timestamp: &Timestamp,
    confirm: &mut C,
) -> SweepResult<ResetReport>
where
    R: Repository + ?Sized,
    C: Confirm + ?Sized,
{
    ensure_repository(repo)?;
    require_confirmation(confirm, &confirmation_prompt(options))?;
    info!(
        path = %repo.workdir().display(),
        remote = %options.remote,
        main = %options.main_branch,
        "starting hard reset"
    );

    let mut report = ResetReport::default();
    match execute(repo, options, timestamp, &mut report) {
        Ok(()) => info!(
            deleted_local = report.deleted_local.len(),
            deleted_remote = report.deleted_remote.len(),
            warnings = report.steps.warnings().len(),
            "hard reset finished"
        ),
        Err(_) if report.aborted().is_some() => {}
        Err(e) => return Err(e),
    }
    Ok(report)
}

fn execute<R: Repository + ?Sized>(
    repo: &R,
    options: &ResetOptions,
    timestamp: &Timestamp,
    report: &mut ResetReport,
) -> SweepResult<()> {
    let log = &mut report.steps;
    let remote = options.remote.as_str();
    let main = options.main_branch.as_str();

    if let Some(url) = &options.remote_url {
        report.remote_change = log.settle(
            Operation::ConfigureRemote,
            None,
            StepOutcome::fatal(reconcile_remote(repo, remote, url)),
        )?;
    }

    log.settle(
        Operation::Fetch,
        None,
        StepOutcome::warned(repo.fetch(remote, true)),
    )?;

    if options.backup {
        let tag = backup_tag_name(&options.backup_tag_prefix, timestamp);
        let created = log.settle(
            Operation::Tag,
            Some(&tag),
            StepOutcome::warned(create_backup(repo, &tag)),
        )?;
        if let Some(Some(commit)) = created {
            let pushed = log
                .settle(
                    Operation::PushTag,
                    Some(&tag),
                    StepOutcome::warned(repo.push(
                        remote,
                        &format!("refs/tags/{tag}"),
                        PushOptions::default(),
                    )),
                )?
                .is_some();
            info!(tag = %tag, commit = %commit, pushed, "created backup tag");
            report.backup = Some(BackupTag {
                name: tag,
                commit,
                pushed,
            });
        }
    } else {
        info!("backup tag disabled");
    }

    report.final_wip = log
        .settle(
            Operation::Commit,
            None,
            StepOutcome::warned(commit_wip(repo, &final_wip_message(timestamp))),
        )?
        .unwrap_or(false);
    log.settle(
        Operation::Commit,
        None,
        StepOutcome::fatal(require_head(repo)),
    )?;

    log.settle(
        Operation::Checkout,
        Some(main),
        StepOutcome::fatal(checkout_main(repo, main)),
    )?;

    let locals = log
        .settle(
            Operation::ListLocalBranches,
            None,
            StepOutcome::warned(repo.list_local_branches()),
        )?
        .unwrap_or_default();
    for branch in locals.iter().filter(|b| *b != main) {
        let deleted = log.settle(
            Operation::DeleteBranch,
            Some(branch),
            StepOutcome::warned(repo.delete_branch(branch, true)),
        )?;
        if deleted.is_some() {
            info!(branch = %branch, "deleted local branch");
            report.deleted_local.push(branch.clone());
        }
    }

    report.new_root = log.settle(
        Operation::RewriteHistory,
        Some(main),
        StepOutcome::fatal(rewrite_main(repo, main, timestamp)),
    )?;

    log.settle(
        Operation::ForcePush,
        Some(main),
        StepOutcome::fatal(repo.push(remote, main, PushOptions::force_tracking())),
    )?;
    report.force_pushed = true;
    info!(branch = main, remote, "force-pushed rewritten main");

    let remotes = log
        .settle(
            Operation::ListRemoteBranches,
            None,
            StepOutcome::warned(repo.list_remote_branches(remote)),
        )?
        .unwrap_or_default();
    for branch in remotes.iter().filter(|b| *b != main) {
        let deleted = log.settle(
            Operation::DeleteRemoteBranch,
            Some(branch),
            StepOutcome::warned(repo.push_delete(remote, branch)),
        )?;
        if deleted.is_some() {
            info!(branch = %branch, remote, "deleted remote branch");
            report.deleted_remote.push(branch.clone());
        }
    }

    if options.push_tags {
        report.tags_pushed = log
            .settle(
                Operation::PushTags,
                None,
                StepOutcome::warned(repo.push_tags(remote)),
            )?
            .is_some();
    }
    Ok(())
}

fn reconcile_remote<R: Repository + ?Sized>(
    repo: &R,
    remote: &str,
    url: &str,
) -> SweepResult<RemoteChange> {
    match repo.remote_url(remote)? {
        None => {
            info!(remote, url, "adding remote");
            repo.add_remote(remote, url)?;
            Ok(RemoteChange::Added)
        }
        Some(current) if current == url => Ok(RemoteChange::Unchanged),
        Some(previous) => {
            info!(remote, from = %previous, to = url, "updating remote URL");
            repo.set_remote_url(remote, url)?;
            Ok(RemoteChange::Updated { previous })
        }
    }
}

/// Tag HEAD; `None` when HEAD has no commits yet.
fn create_backup<R: Repository + ?Sized>(repo: &R, tag: &str) -> SweepResult<Option<String>> {
    let Some(head) = repo.head_commit()? else {
        info!("HEAD has no commits, skipping backup tag");
        return Ok(None);
    };
    repo.tag(tag, &head)?;
    Ok(Some(head))
}

fn require_head<R: Repository + ?Sized>(repo: &R) -> SweepResult<String> {
    repo.head_commit()?
        .ok_or_else(|| bail_out("nothing to reset: HEAD has no commits"))
}

/// Point main at HEAD and check it out.
fn checkout_main<R: Repository + ?Sized>(repo: &R, main: &str) -> SweepResult<()> {
    if let CurrentRef::Branch(current) = repo.current_ref()?
        && current == main
    {
        return Ok(());
    }
    repo.create_branch(main, None, true)?;
    repo.checkout(main)
}

/// Replace main with a single root commit of the work tree.
fn rewrite_main<R: Repository + ?Sized>(
    repo: &R,
    main: &str,
    timestamp: &Timestamp,
) -> SweepResult<String> {
    let temp = format!("fresh-start-{timestamp}");
    repo.checkout_orphan(&temp)?;
    repo.stage_all()?;
    repo.commit(&fresh_start_message(timestamp))?;
    repo.delete_branch(main, true)?;
    repo.rename_branch(&temp, main)?;
    repo.head_commit()?
        .ok_or_else(|| bail_out(format!("{main} has no commit after rewrite")))
}
