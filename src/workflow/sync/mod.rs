// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch Sync: commit and push every local branch, then reconcile main.
//!
//! ```text
//!  validate --> remember HEAD (RestoreGuard)
//!     |
//!     v
//!  fetch --prune ........................ warn
//!  ensure main (local | remote | HEAD) .. warn
//!  commit WIP on current branch ......... warn
//!  plan = local branches (once)
//!     |
//!     +--> for branch in plan
//!     |      checkout ... warn, skip branch
//!     |      commit WIP . warn
//!     |      push ....... warn
//!     v
//!  checkout main, pull --rebase, push ... warn
//!  restore HEAD ......................... warn
//! ```
//!
//! Only a missing repository is fatal; every other failure is recorded in
//! the [`SyncReport`] and the batch carries on.

use bon::Builder;
use tracing::{info, warn};

use super::{
    Operation, StepLog, StepOutcome, Timestamp, commit_wip, ensure_repository, wip_message,
};
use crate::error::{GitError, SweepResult, bail_out};
use crate::git::backend::{CurrentRef, PushOptions, Repository};

/// Inputs of a Branch Sync run.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SyncOptions {
    #[builder(setters(name = with_remote), into, default = String::from("origin"))]
    pub remote: String,
    #[builder(setters(name = with_main_branch), into, default = String::from("main"))]
    pub main_branch: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Where the local main branch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainSource {
    /// Already present locally.
    Existing,
    /// Created from `<remote>/<main>`.
    Remote,
    /// Created at the current HEAD; the remote has no main yet.
    Placeholder,
}

/// What a Branch Sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Ref checked out before the run, restored afterwards.
    pub original: CurrentRef,
    /// `None` when main could not be established.
    pub main_source: Option<MainSource>,
    pub plan: Vec<String>,
    pub committed: Vec<String>,
    pub pushed: Vec<String>,
    pub main_rebased: bool,
    pub main_pushed: bool,
    pub restored: bool,
    pub steps: StepLog,
}

impl SyncReport {
    fn new(original: CurrentRef) -> Self {
        Self {
            original,
            main_source: None,
            plan: Vec::new(),
            committed: Vec::new(),
            pushed: Vec::new(),
            main_rebased: false,
            main_pushed: false,
            restored: false,
            steps: StepLog::default(),
        }
    }
}

/// Checks the original ref out again when dropped, unless already restored.
struct RestoreGuard<'a, R: Repository + ?Sized> {
    repo: &'a R,
    original: CurrentRef,
    done: bool,
}

impl<'a, R: Repository + ?Sized> RestoreGuard<'a, R> {
    const fn new(repo: &'a R, original: CurrentRef) -> Self {
        Self {
            repo,
            original,
            done: false,
        }
    }

    fn restore(&mut self) -> SweepResult<()> {
        self.done = true;
        if self.repo.current_ref()? == self.original {
            return Ok(());
        }
        info!(checkout = %self.original, "restoring original checkout");
        self.repo.checkout(self.original.checkout_target())
    }
}

impl<R: Repository + ?Sized> Drop for RestoreGuard<'_, R> {
    fn drop(&mut self) {
        if !self.done
            && let Err(e) = self.restore()
        {
            warn!(checkout = %self.original, error = %e, "failed to restore original checkout");
        }
    }
}

/// Run Branch Sync against `repo`.
///
/// # Errors
///
/// Returns an error only if `repo` is not a repository or HEAD cannot be
/// resolved; step failures are collected in [`SyncReport::steps`].
pub fn run_sync<R: Repository + ?Sized>(
    repo: &R,
    options: &SyncOptions,
    timestamp: &Timestamp,
) -> SweepResult<SyncReport> {
    ensure_repository(repo)?;
    let original = repo.current_ref()?;
    info!(
        path = %repo.workdir().display(),
        remote = %options.remote,
        main = %options.main_branch,
        head = %original,
        "starting branch sync"
    );

    let mut guard = RestoreGuard::new(repo, original.clone());
    let mut report = SyncReport::new(original);
    let log = &mut report.steps;
    let remote = options.remote.as_str();
    let main = options.main_branch.as_str();

    log.settle(
        Operation::Fetch,
        None,
        StepOutcome::warned(repo.fetch(remote, true)),
    )?;

    report.main_source = log.settle(
        Operation::EnsureMain,
        Some(main),
        StepOutcome::warned(ensure_main(repo, remote, main)),
    )?;

    match &report.original {
        CurrentRef::Branch(branch) => {
            let committed = log.settle(
                Operation::Commit,
                Some(branch),
                StepOutcome::warned(commit_wip(repo, &wip_message(branch, timestamp))),
            )?;
            if committed == Some(true) {
                report.committed.push(branch.clone());
            }
        }
        CurrentRef::Detached(_) => {
            let dirty = repo.is_dirty().unwrap_or(false);
            if dirty {
                log.settle::<()>(
                    Operation::Commit,
                    None,
                    StepOutcome::Warned(
                        "detached HEAD has uncommitted changes, they move to the first branch checked out"
                            .to_string(),
                    ),
                )?;
            }
        }
    }

    report.plan = log
        .settle(
            Operation::ListLocalBranches,
            None,
            StepOutcome::warned(repo.list_local_branches()),
        )?
        .unwrap_or_default();
    if report.plan.is_empty() {
        info!("no local branches, nothing to sync");
        report.restored = settle_restore(&mut guard, log)?;
        return Ok(report);
    }
    info!(branches = report.plan.len(), "syncing branches");

    for branch in &report.plan {
        let checked_out = log.settle(
            Operation::Checkout,
            Some(branch),
            StepOutcome::warned(repo.checkout(branch)),
        )?;
        if checked_out.is_none() {
            continue;
        }

        let committed = log.settle(
            Operation::Commit,
            Some(branch),
            StepOutcome::warned(commit_wip(repo, &wip_message(branch, timestamp))),
        )?;
        if committed == Some(true) {
            info!(branch = %branch, "committed work in progress");
            report.committed.push(branch.clone());
        }

        let pushed = log.settle(
            Operation::Push,
            Some(branch),
            StepOutcome::warned(push_branch(repo, remote, branch)),
        )?;
        if pushed.is_some() {
            info!(branch = %branch, remote, "pushed");
            report.pushed.push(branch.clone());
        }
    }

    let on_main = log.settle(
        Operation::Checkout,
        Some(main),
        StepOutcome::warned(repo.checkout(main)),
    )?;
    if on_main.is_some() {
        report.main_rebased = log
            .settle(
                Operation::Rebase,
                Some(main),
                StepOutcome::warned(rebase_main(repo, remote, main)),
            )?
            .unwrap_or(false);
        report.main_pushed = log
            .settle(
                Operation::Push,
                Some(main),
                StepOutcome::warned(push_branch(repo, remote, main)),
            )?
            .is_some();
    }

    report.restored = settle_restore(&mut guard, log)?;
    info!(
        committed = report.committed.len(),
        pushed = report.pushed.len(),
        warnings = report.steps.warnings().len(),
        "branch sync finished"
    );
    Ok(report)
}

fn settle_restore<R: Repository + ?Sized>(
    guard: &mut RestoreGuard<'_, R>,
    log: &mut StepLog,
) -> SweepResult<bool> {
    let target = guard.original.checkout_target().to_string();
    let restored = log.settle(
        Operation::Checkout,
        Some(&target),
        StepOutcome::warned(guard.restore()),
    )?;
    Ok(restored.is_some())
}

fn ensure_main<R: Repository + ?Sized>(
    repo: &R,
    remote: &str,
    main: &str,
) -> SweepResult<MainSource> {
    if repo.branch_exists(main)? {
        return Ok(MainSource::Existing);
    }
    if repo.remote_branch_exists(remote, main)? {
        info!(branch = main, remote, "creating main from remote");
        repo.create_branch(main, Some(&format!("{remote}/{main}")), false)?;
        return Ok(MainSource::Remote);
    }
    if repo.head_commit()?.is_none() {
        return Err(bail_out(format!(
            "cannot create placeholder {main}: HEAD has no commits"
        )));
    }
    info!(branch = main, "creating placeholder main at HEAD");
    repo.create_branch(main, None, false)?;
    Ok(MainSource::Placeholder)
}

fn push_branch<R: Repository + ?Sized>(repo: &R, remote: &str, branch: &str) -> SweepResult<()> {
    let missing_upstream = repo.upstream(branch)?.is_none();
    repo.push(remote, branch, PushOptions::tracking(missing_upstream))
}

/// Returns whether a rebase was attempted.
///
/// A conflict leaves the work tree mid-rebase; the warning says how to get
/// out of it.
fn rebase_main<R: Repository + ?Sized>(repo: &R, remote: &str, main: &str) -> SweepResult<bool> {
    if !repo.remote_branch_exists(remote, main)? {
        return Ok(false);
    }
    repo.pull_rebase(remote, main)
        .map_err(|e| GitError::RebaseStopped {
            branch: main.to_string(),
            message: e.to_string(),
        })?;
    Ok(true)
}
