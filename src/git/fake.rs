// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory repository for workflow tests.
//!
//! Models one work tree with a single remote server, enough history to count
//! commits per branch, and failure injection for the network operations.

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::backend::{CurrentRef, PushOptions, RepoMutation, RepoQuery};
use crate::error::{GitError, SweepResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeCommit {
    pub(crate) message: String,
    pub(crate) parent: Option<String>,
    pub(crate) files: BTreeSet<String>,
}

/// Failure injection switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Failures {
    pub(crate) fetch: bool,
    pub(crate) all_pushes: bool,
    pub(crate) pushes: BTreeSet<String>,
    pub(crate) force_push: bool,
    pub(crate) push_delete: BTreeSet<String>,
    pub(crate) pull_rebase: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FakeState {
    pub(crate) head: Option<CurrentRef>,
    pub(crate) commits: BTreeMap<String, FakeCommit>,
    pub(crate) branches: BTreeMap<String, String>,
    pub(crate) upstreams: BTreeMap<String, String>,
    pub(crate) tags: BTreeMap<String, String>,
    /// Changed or untracked files not yet staged.
    pub(crate) wip: BTreeSet<String>,
    pub(crate) staged: BTreeSet<String>,
    pub(crate) remotes: BTreeMap<String, String>,
    /// Branch tips on the remote server.
    pub(crate) server: BTreeMap<String, String>,
    pub(crate) server_tags: BTreeSet<String>,
    /// Remote-tracking refs as last fetched or pushed.
    pub(crate) tracking: BTreeMap<String, String>,
}

/// One recorded push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PushRecord {
    pub(crate) refspec: String,
    pub(crate) options: PushOptions,
}

pub(crate) struct FakeRepository {
    path: PathBuf,
    repository: bool,
    remote: String,
    state: RefCell<FakeState>,
    failures: RefCell<Failures>,
    mutations: RefCell<Vec<String>>,
    pushes: RefCell<Vec<PushRecord>>,
    next_id: RefCell<u32>,
}

fn failed(command: String, message: &str) -> crate::error::SweepError {
    GitError::CommandFailed {
        command,
        message: message.to_string(),
    }
    .into()
}

impl FakeRepository {
    /// Repository whose branches all point at one root commit holding
    /// `README.md`, with `main` checked out and `origin` configured.
    pub(crate) fn with_branches(branches: &[&str]) -> Self {
        let mut state = FakeState::default();
        let root = FakeCommit {
            message: "initial".to_string(),
            parent: None,
            files: BTreeSet::from(["README.md".to_string()]),
        };
        state.commits.insert("c0".to_string(), root);
        for branch in branches {
            state.branches.insert((*branch).to_string(), "c0".to_string());
        }
        state.head = Some(CurrentRef::Branch(
            branches.first().copied().unwrap_or("main").to_string(),
        ));
        state
            .remotes
            .insert("origin".to_string(), "https://example.com/repo.git".to_string());

        Self {
            path: PathBuf::from("/fake/repo"),
            repository: true,
            remote: "origin".to_string(),
            state: RefCell::new(state),
            failures: RefCell::new(Failures::default()),
            mutations: RefCell::new(Vec::new()),
            pushes: RefCell::new(Vec::new()),
            next_id: RefCell::new(1),
        }
    }

    pub(crate) fn not_a_repository() -> Self {
        let mut repo = Self::with_branches(&[]);
        repo.repository = false;
        repo
    }

    /// Publish every local branch to the server with upstream tracking.
    pub(crate) fn published(self) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let branches = state.branches.clone();
            for (name, tip) in branches {
                state.server.insert(name.clone(), tip.clone());
                state.tracking.insert(name.clone(), tip);
                state
                    .upstreams
                    .insert(name.clone(), format!("{}/{name}", self.remote));
            }
        }
        self
    }

    pub(crate) fn on(self, what: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let head = if state.branches.contains_key(what) {
                CurrentRef::Branch(what.to_string())
            } else {
                CurrentRef::Detached(what.to_string())
            };
            state.head = Some(head);
        }
        self
    }

    pub(crate) fn with_wip(self, file: &str) -> Self {
        self.state.borrow_mut().wip.insert(file.to_string());
        self
    }

    pub(crate) fn without_remote(self) -> Self {
        self.state.borrow_mut().remotes.clear();
        self
    }

    /// Add a server-side branch that is not present locally.
    pub(crate) fn with_server_branch(self, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.server.insert(name.to_string(), "c0".to_string());
        }
        self
    }

    pub(crate) fn fail(self, configure: impl FnOnce(&mut Failures)) -> Self {
        configure(&mut self.failures.borrow_mut());
        self
    }

    pub(crate) fn state(&self) -> Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub(crate) fn snapshot(&self) -> FakeState {
        self.state.borrow().clone()
    }

    pub(crate) fn mutations(&self) -> Vec<String> {
        self.mutations.borrow().clone()
    }

    pub(crate) fn pushes(&self) -> Vec<PushRecord> {
        self.pushes.borrow().clone()
    }

    /// Commit messages reachable from `branch`, newest first.
    pub(crate) fn history(&self, branch: &str) -> Vec<String> {
        let state = self.state.borrow();
        let mut messages = Vec::new();
        let mut cursor = state.branches.get(branch).cloned();
        while let Some(id) = cursor {
            let commit = &state.commits[&id];
            messages.push(commit.message.clone());
            cursor = commit.parent.clone();
        }
        messages
    }

    /// Files in the commit at the tip of `branch`.
    pub(crate) fn files_at(&self, branch: &str) -> BTreeSet<String> {
        let state = self.state.borrow();
        state
            .branches
            .get(branch)
            .map(|tip| state.commits[tip].files.clone())
            .unwrap_or_default()
    }

    fn record(&self, mutation: String) {
        self.mutations.borrow_mut().push(mutation);
    }

    fn head_id(state: &FakeState) -> Option<String> {
        match state.head.as_ref()? {
            CurrentRef::Branch(name) => state.branches.get(name).cloned(),
            CurrentRef::Detached(id) => Some(id.clone()),
        }
    }

    fn resolve(&self, state: &FakeState, what: &str) -> Option<String> {
        if let Some(tip) = state.branches.get(what) {
            return Some(tip.clone());
        }
        if let Some(name) = what
            .strip_prefix(&self.remote)
            .and_then(|rest| rest.strip_prefix('/'))
            && let Some(tip) = state.tracking.get(name)
        {
            return Some(tip.clone());
        }
        state.commits.contains_key(what).then(|| what.to_string())
    }

    fn is_ancestor(state: &FakeState, ancestor: &str, of: &str) -> bool {
        let mut cursor = Some(of.to_string());
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = state.commits.get(&id).and_then(|c| c.parent.clone());
        }
        false
    }

    fn check_remote(&self, state: &FakeState, remote: &str) -> SweepResult<()> {
        if state.remotes.contains_key(remote) {
            Ok(())
        } else {
            Err(GitError::RemoteNotFound {
                remote: remote.to_string(),
            }
            .into())
        }
    }
}

impl RepoQuery for FakeRepository {
    fn workdir(&self) -> &Path {
        &self.path
    }

    fn is_repository(&self) -> bool {
        self.repository
    }

    fn current_ref(&self) -> SweepResult<CurrentRef> {
        self.state
            .borrow()
            .head
            .clone()
            .ok_or_else(|| failed("git rev-parse HEAD".to_string(), "no HEAD"))
    }

    fn is_dirty(&self) -> SweepResult<bool> {
        let state = self.state.borrow();
        Ok(!state.wip.is_empty() || !state.staged.is_empty())
    }

    fn head_commit(&self) -> SweepResult<Option<String>> {
        Ok(Self::head_id(&self.state.borrow()))
    }

    fn branch_exists(&self, name: &str) -> SweepResult<bool> {
        Ok(self.state.borrow().branches.contains_key(name))
    }

    fn remote_branch_exists(&self, remote: &str, name: &str) -> SweepResult<bool> {
        Ok(remote == self.remote && self.state.borrow().tracking.contains_key(name))
    }

    fn upstream(&self, branch: &str) -> SweepResult<Option<String>> {
        Ok(self.state.borrow().upstreams.get(branch).cloned())
    }

    fn list_local_branches(&self) -> SweepResult<Vec<String>> {
        Ok(self.state.borrow().branches.keys().cloned().collect())
    }

    fn list_remote_branches(&self, remote: &str) -> SweepResult<Vec<String>> {
        if remote != self.remote {
            return Ok(Vec::new());
        }
        Ok(self.state.borrow().tracking.keys().cloned().collect())
    }

    fn remote_url(&self, name: &str) -> SweepResult<Option<String>> {
        Ok(self.state.borrow().remotes.get(name).cloned())
    }
}

impl RepoMutation for FakeRepository {
    fn stage_all(&self) -> SweepResult<()> {
        self.record("add -A".to_string());
        let mut state = self.state.borrow_mut();
        let wip = std::mem::take(&mut state.wip);
        state.staged.extend(wip);
        Ok(())
    }

    fn commit(&self, message: &str) -> SweepResult<()> {
        self.record(format!("commit {message}"));
        let mut state = self.state.borrow_mut();
        let parent = Self::head_id(&state);
        let parent_files = parent
            .as_ref()
            .map(|id| state.commits[id].files.clone())
            .unwrap_or_default();
        if state.staged.is_empty() {
            return Err(GitError::NothingToCommit.into());
        }

        let id = {
            let mut next = self.next_id.borrow_mut();
            let id = format!("c{next}");
            *next += 1;
            id
        };
        let mut files = parent_files;
        files.extend(std::mem::take(&mut state.staged));
        state.commits.insert(
            id.clone(),
            FakeCommit {
                message: message.to_string(),
                parent,
                files,
            },
        );
        match state.head.clone() {
            Some(CurrentRef::Branch(name)) => {
                state.branches.insert(name, id);
            }
            _ => state.head = Some(CurrentRef::Detached(id)),
        }
        Ok(())
    }

    fn checkout(&self, what: &str) -> SweepResult<()> {
        self.record(format!("checkout {what}"));
        let mut state = self.state.borrow_mut();
        if state.branches.contains_key(what) {
            state.head = Some(CurrentRef::Branch(what.to_string()));
            Ok(())
        } else if state.commits.contains_key(what) {
            state.head = Some(CurrentRef::Detached(what.to_string()));
            Ok(())
        } else {
            Err(GitError::CheckoutFailed {
                what: what.to_string(),
                message: "pathspec did not match".to_string(),
            }
            .into())
        }
    }

    fn checkout_orphan(&self, name: &str) -> SweepResult<()> {
        self.record(format!("checkout --orphan {name}"));
        let mut state = self.state.borrow_mut();
        if state.branches.contains_key(name) {
            return Err(failed(
                format!("git checkout --orphan {name}"),
                "branch already exists",
            ));
        }
        // the index keeps the previous tree, now all of it "new"
        if let Some(tip) = Self::head_id(&state) {
            let files = state.commits[&tip].files.clone();
            state.staged.extend(files);
        }
        state.head = Some(CurrentRef::Branch(name.to_string()));
        Ok(())
    }

    fn create_branch(&self, name: &str, start: Option<&str>, force: bool) -> SweepResult<()> {
        self.record(format!(
            "branch{} {name} {}",
            if force { " --force" } else { "" },
            start.unwrap_or("HEAD")
        ));
        let mut state = self.state.borrow_mut();
        let command = format!("git branch {name}");
        if state.branches.contains_key(name) && !force {
            return Err(failed(command, "branch already exists"));
        }
        if state.head == Some(CurrentRef::Branch(name.to_string())) {
            return Err(failed(command, "cannot force update the current branch"));
        }
        let target = match start {
            Some(start) => self.resolve(&state, start),
            None => Self::head_id(&state),
        }
        .ok_or_else(|| failed(command, "not a valid object name"))?;
        state.branches.insert(name.to_string(), target);
        Ok(())
    }

    fn delete_branch(&self, name: &str, force: bool) -> SweepResult<()> {
        self.record(format!("branch {} {name}", if force { "-D" } else { "-d" }));
        let mut state = self.state.borrow_mut();
        let command = format!("git branch -D {name}");
        if state.head == Some(CurrentRef::Branch(name.to_string())) {
            return Err(failed(command, "cannot delete the checked out branch"));
        }
        if state.branches.remove(name).is_none() {
            return Err(failed(command, "branch not found"));
        }
        state.upstreams.remove(name);
        Ok(())
    }

    fn rename_branch(&self, old: &str, new: &str) -> SweepResult<()> {
        self.record(format!("branch -M {old} {new}"));
        let mut state = self.state.borrow_mut();
        let tip = state
            .branches
            .remove(old)
            .ok_or_else(|| failed(format!("git branch -M {old} {new}"), "branch not found"))?;
        state.branches.insert(new.to_string(), tip);
        if let Some(upstream) = state.upstreams.remove(old) {
            state.upstreams.insert(new.to_string(), upstream);
        }
        if state.head == Some(CurrentRef::Branch(old.to_string())) {
            state.head = Some(CurrentRef::Branch(new.to_string()));
        }
        Ok(())
    }

    fn fetch(&self, remote: &str, prune: bool) -> SweepResult<()> {
        self.record(format!("fetch {remote}"));
        let mut state = self.state.borrow_mut();
        self.check_remote(&state, remote)?;
        if self.failures.borrow().fetch {
            return Err(failed(format!("git fetch {remote}"), "could not resolve host"));
        }
        let server = state.server.clone();
        if prune {
            state.tracking = server;
        } else {
            state.tracking.extend(server);
        }
        Ok(())
    }

    fn pull_rebase(&self, remote: &str, branch: &str) -> SweepResult<()> {
        self.record(format!("pull --rebase {remote} {branch}"));
        let mut state = self.state.borrow_mut();
        if self.failures.borrow().pull_rebase {
            return Err(failed(
                format!("git pull --rebase {remote} {branch}"),
                "CONFLICT (content): merge conflict",
            ));
        }
        let Some(CurrentRef::Branch(current)) = state.head.clone() else {
            return Err(failed("git pull --rebase".to_string(), "not on a branch"));
        };
        let (Some(local), Some(upstream)) = (
            state.branches.get(&current).cloned(),
            state.tracking.get(branch).cloned(),
        ) else {
            return Ok(());
        };
        if Self::is_ancestor(&state, &local, &upstream) {
            state.branches.insert(current, upstream);
        }
        Ok(())
    }

    fn push(&self, remote: &str, refspec: &str, options: PushOptions) -> SweepResult<()> {
        self.record(format!("push {remote} {refspec}"));
        self.pushes.borrow_mut().push(PushRecord {
            refspec: refspec.to_string(),
            options,
        });
        let mut state = self.state.borrow_mut();
        self.check_remote(&state, remote)?;
        let command = format!("git push {remote} {refspec}");
        {
            let failures = self.failures.borrow();
            if failures.all_pushes || failures.pushes.contains(refspec) {
                return Err(failed(command, "unable to access remote"));
            }
            if options.force && failures.force_push {
                return Err(failed(command, "protected branch hook declined"));
            }
        }

        if let Some(tag) = refspec.strip_prefix("refs/tags/") {
            if !state.tags.contains_key(tag) {
                return Err(failed(command, "src refspec does not match any"));
            }
            state.server_tags.insert(tag.to_string());
            return Ok(());
        }

        let tip = state
            .branches
            .get(refspec)
            .cloned()
            .ok_or_else(|| failed(command.clone(), "src refspec does not match any"))?;
        if let Some(existing) = state.server.get(refspec)
            && !options.force
            && !Self::is_ancestor(&state, existing, &tip)
        {
            return Err(failed(command, "rejected (non-fast-forward)"));
        }
        state.server.insert(refspec.to_string(), tip.clone());
        state.tracking.insert(refspec.to_string(), tip);
        if options.set_upstream {
            state
                .upstreams
                .insert(refspec.to_string(), format!("{remote}/{refspec}"));
        }
        Ok(())
    }

    fn push_delete(&self, remote: &str, branch: &str) -> SweepResult<()> {
        self.record(format!("push --delete {remote} {branch}"));
        let mut state = self.state.borrow_mut();
        self.check_remote(&state, remote)?;
        let command = format!("git push --delete {remote} {branch}");
        if self.failures.borrow().push_delete.contains(branch) {
            return Err(failed(command, "deletion of the branch is prohibited"));
        }
        if state.server.remove(branch).is_none() {
            return Err(failed(command, "remote ref does not exist"));
        }
        state.tracking.remove(branch);
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> SweepResult<()> {
        self.record(format!("push --tags {remote}"));
        let mut state = self.state.borrow_mut();
        self.check_remote(&state, remote)?;
        if self.failures.borrow().all_pushes {
            return Err(failed(format!("git push --tags {remote}"), "unable to access remote"));
        }
        let tags: Vec<String> = state.tags.keys().cloned().collect();
        state.server_tags.extend(tags);
        Ok(())
    }

    fn tag(&self, name: &str, target: &str) -> SweepResult<()> {
        self.record(format!("tag {name} {target}"));
        let mut state = self.state.borrow_mut();
        let command = format!("git tag {name} {target}");
        if state.tags.contains_key(name) {
            return Err(failed(command, "tag already exists"));
        }
        let id = self
            .resolve(&state, target)
            .ok_or_else(|| failed(command, "not a valid object name"))?;
        state.tags.insert(name.to_string(), id);
        Ok(())
    }

    fn add_remote(&self, name: &str, url: &str) -> SweepResult<()> {
        self.record(format!("remote add {name} {url}"));
        let mut state = self.state.borrow_mut();
        if state.remotes.contains_key(name) {
            return Err(failed(
                format!("git remote add {name} {url}"),
                "remote already exists",
            ));
        }
        state.remotes.insert(name.to_string(), url.to_string());
        Ok(())
    }

    fn set_remote_url(&self, name: &str, url: &str) -> SweepResult<()> {
        self.record(format!("remote set-url {name} {url}"));
        let mut state = self.state.borrow_mut();
        match state.remotes.get_mut(name) {
            Some(existing) => {
                *existing = url.to_string();
                Ok(())
            }
            None => Err(GitError::RemoteNotFound {
                remote: name.to_string(),
            }
            .into()),
        }
    }
}
