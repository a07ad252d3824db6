// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `--dry` support: queries hit the real repository, mutations are logged.
//!
//! The workflow still runs end to end, so the log shows every step it would
//! take. Later queries see the unmodified repository, which means a dry run
//! can report more WIP commits than a real run would make.

use std::path::Path;

use tracing::info;

use super::backend::{CurrentRef, PushOptions, RepoMutation, RepoQuery};
use crate::error::SweepResult;

/// Wraps a repository and turns every mutation into a log line.
#[derive(Debug, Clone)]
pub struct DryRun<R> {
    inner: R,
}

impl<R> DryRun<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[allow(clippy::unnecessary_wraps)]
fn skipped(action: &str) -> SweepResult<()> {
    info!(action, "dry run, skipped");
    Ok(())
}

impl<R: RepoQuery> RepoQuery for DryRun<R> {
    fn workdir(&self) -> &Path {
        self.inner.workdir()
    }

    fn is_repository(&self) -> bool {
        self.inner.is_repository()
    }

    fn current_ref(&self) -> SweepResult<CurrentRef> {
        self.inner.current_ref()
    }

    fn is_dirty(&self) -> SweepResult<bool> {
        self.inner.is_dirty()
    }

    fn head_commit(&self) -> SweepResult<Option<String>> {
        self.inner.head_commit()
    }

    fn branch_exists(&self, name: &str) -> SweepResult<bool> {
        self.inner.branch_exists(name)
    }

    fn remote_branch_exists(&self, remote: &str, name: &str) -> SweepResult<bool> {
        self.inner.remote_branch_exists(remote, name)
    }

    fn upstream(&self, branch: &str) -> SweepResult<Option<String>> {
        self.inner.upstream(branch)
    }

    fn list_local_branches(&self) -> SweepResult<Vec<String>> {
        self.inner.list_local_branches()
    }

    fn list_remote_branches(&self, remote: &str) -> SweepResult<Vec<String>> {
        self.inner.list_remote_branches(remote)
    }

    fn remote_url(&self, name: &str) -> SweepResult<Option<String>> {
        self.inner.remote_url(name)
    }
}

impl<R> RepoMutation for DryRun<R> {
    fn stage_all(&self) -> SweepResult<()> {
        skipped("git add -A")
    }

    fn commit(&self, message: &str) -> SweepResult<()> {
        skipped(&format!("git commit -m {message:?}"))
    }

    fn checkout(&self, what: &str) -> SweepResult<()> {
        skipped(&format!("git checkout {what}"))
    }

    fn checkout_orphan(&self, name: &str) -> SweepResult<()> {
        skipped(&format!("git checkout --orphan {name}"))
    }

    fn create_branch(&self, name: &str, start: Option<&str>, force: bool) -> SweepResult<()> {
        let force = if force { " --force" } else { "" };
        skipped(&format!(
            "git branch{force} {name} {}",
            start.unwrap_or("HEAD")
        ))
    }

    fn delete_branch(&self, name: &str, force: bool) -> SweepResult<()> {
        let flag = if force { "-D" } else { "-d" };
        skipped(&format!("git branch {flag} {name}"))
    }

    fn rename_branch(&self, old: &str, new: &str) -> SweepResult<()> {
        skipped(&format!("git branch -M {old} {new}"))
    }

    fn fetch(&self, remote: &str, prune: bool) -> SweepResult<()> {
        let prune = if prune { " --prune" } else { "" };
        skipped(&format!("git fetch{prune} {remote}"))
    }

    fn pull_rebase(&self, remote: &str, branch: &str) -> SweepResult<()> {
        skipped(&format!("git pull --rebase {remote} {branch}"))
    }

    fn push(&self, remote: &str, refspec: &str, options: PushOptions) -> SweepResult<()> {
        let force = if options.force { " --force" } else { "" };
        let upstream = if options.set_upstream {
            " --set-upstream"
        } else {
            ""
        };
        skipped(&format!("git push{force}{upstream} {remote} {refspec}"))
    }

    fn push_delete(&self, remote: &str, branch: &str) -> SweepResult<()> {
        skipped(&format!("git push --delete {remote} {branch}"))
    }

    fn push_tags(&self, remote: &str) -> SweepResult<()> {
        skipped(&format!("git push --tags {remote}"))
    }

    fn tag(&self, name: &str, target: &str) -> SweepResult<()> {
        skipped(&format!("git tag {name} {target}"))
    }

    fn add_remote(&self, name: &str, url: &str) -> SweepResult<()> {
        skipped(&format!("git remote add {name} {url}"))
    }

    fn set_remote_url(&self, name: &str, url: &str) -> SweepResult<()> {
        skipped(&format!("git remote set-url {name} {url}"))
    }
}
