// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch maintenance workflows.
//!
//! ```text
//!  step fn --> StepOutcome<T> --> StepLog::settle
//!                                   Ok(v)        -> Some(v)
//!                                   Warned(why)  -> warn!, recorded, None
//!                                   Fatal(why)   -> error!, recorded, Err
//!
//!  sync::run_sync    WIP commit + push every branch, rebase main
//!  reset::run_reset  backup tag, orphan main, force push, purge branches
//! ```
//!
//! Every run captures one [`Timestamp`] up front; all commit messages and the
//! backup tag of that run carry it verbatim.

pub mod confirm;
pub mod reset;
pub mod sync;

use std::fmt;

use chrono::Local;
use tracing::{error, warn};

use crate::error::{GitError, SweepResult, bail_out};
use crate::git::backend::Repository;

/// Format of [`Timestamp`]; safe inside ref names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Moment a run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Use a preformatted value (tests, reproducible runs).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[must_use]
pub fn wip_message(branch: &str, timestamp: &Timestamp) -> String {
    format!("chore: save WIP on {branch} ({timestamp})")
}

#[must_use]
pub fn final_wip_message(timestamp: &Timestamp) -> String {
    format!("chore: final WIP before full reset ({timestamp})")
}

#[must_use]
pub fn fresh_start_message(timestamp: &Timestamp) -> String {
    format!("feat: fresh start ({timestamp})")
}

#[must_use]
pub fn backup_tag_name(prefix: &str, timestamp: &Timestamp) -> String {
    format!("{prefix}-{timestamp}")
}

/// Which collaborator operation a step performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ValidateRepository,
    ConfigureRemote,
    Fetch,
    EnsureMain,
    Commit,
    Checkout,
    Push,
    Rebase,
    Tag,
    PushTag,
    DeleteBranch,
    RewriteHistory,
    ForcePush,
    ListLocalBranches,
    ListRemoteBranches,
    DeleteRemoteBranch,
    PushTags,
}

impl Operation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateRepository => "validate-repository",
            Self::ConfigureRemote => "configure-remote",
            Self::Fetch => "fetch",
            Self::EnsureMain => "ensure-main",
            Self::Commit => "commit",
            Self::Checkout => "checkout",
            Self::Push => "push",
            Self::Rebase => "rebase",
            Self::Tag => "tag",
            Self::PushTag => "push-tag",
            Self::DeleteBranch => "delete-branch",
            Self::RewriteHistory => "rewrite-history",
            Self::ForcePush => "force-push",
            Self::ListLocalBranches => "list-local-branches",
            Self::ListRemoteBranches => "list-remote-branches",
            Self::DeleteRemoteBranch => "delete-remote-branch",
            Self::PushTags => "push-tags",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged result of a single workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum StepOutcome<T = ()> {
    Ok(T),
    /// Step failed; the run continues.
    Warned(String),
    /// Step failed; the run stops here.
    Fatal(String),
}

impl<T> StepOutcome<T> {
    /// Failure of this step is recoverable.
    pub fn warned(result: SweepResult<T>) -> Self {
        result.map_or_else(|e| Self::Warned(e.to_string()), Self::Ok)
    }

    /// Failure of this step ends the run.
    pub fn fatal(result: SweepResult<T>) -> Self {
        result.map_or_else(|e| Self::Fatal(e.to_string()), Self::Ok)
    }
}

/// A failed step, with enough context to redo it by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub operation: Operation,
    pub branch: Option<String>,
    pub reason: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{} [{branch}]: {}", self.operation, self.reason),
            None => write!(f, "{}: {}", self.operation, self.reason),
        }
    }
}

/// Failures collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLog {
    warnings: Vec<StepFailure>,
    fatal: Option<StepFailure>,
}

impl StepLog {
    /// Resolve a step outcome: values pass through, warnings are logged and
    /// recorded, a fatal outcome is recorded and returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::Bailed` for [`StepOutcome::Fatal`].
    pub fn settle<T>(
        &mut self,
        operation: Operation,
        branch: Option<&str>,
        outcome: StepOutcome<T>,
    ) -> SweepResult<Option<T>> {
        match outcome {
            StepOutcome::Ok(value) => Ok(Some(value)),
            StepOutcome::Warned(reason) => {
                warn!(%operation, branch = branch.unwrap_or("-"), %reason, "step failed, continuing");
                self.warnings.push(StepFailure {
                    operation,
                    branch: branch.map(str::to_string),
                    reason,
                });
                Ok(None)
            }
            StepOutcome::Fatal(reason) => {
                error!(%operation, branch = branch.unwrap_or("-"), %reason, "step failed, aborting");
                let failure = StepFailure {
                    operation,
                    branch: branch.map(str::to_string),
                    reason,
                };
                let err = bail_out(failure.to_string());
                self.fatal = Some(failure);
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[StepFailure] {
        &self.warnings
    }

    /// The step that ended the run, if one did.
    #[must_use]
    pub const fn fatal(&self) -> Option<&StepFailure> {
        self.fatal.as_ref()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.fatal.is_none()
    }
}

/// Fail fast when the handle does not point into a work tree.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound`.
pub fn ensure_repository<R: Repository + ?Sized>(repo: &R) -> SweepResult<()> {
    if repo.is_repository() {
        Ok(())
    } else {
        Err(GitError::RepoNotFound {
            path: repo.workdir().display().to_string(),
        }
        .into())
    }
}

/// Stage and commit everything if the work tree is dirty.
///
/// Returns whether a commit was made.
///
/// # Errors
///
/// Returns the first failing collaborator call.
pub fn commit_wip<R: Repository + ?Sized>(repo: &R, message: &str) -> SweepResult<bool> {
    if !repo.is_dirty()? {
        return Ok(false);
    }
    repo.stage_all()?;
    repo.commit(message)?;
    Ok(true)
}
