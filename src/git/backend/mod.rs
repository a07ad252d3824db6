// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository collaborator abstraction.
//!
//! ```text
//! RepoQuery (read)     --> GitRepository: gix (discovery, HEAD) + git CLI
//! RepoMutation (write) --> GitRepository: git CLI
//! Repository = RepoQuery + RepoMutation
//! ```
//!
//! Workflows only ever see these traits, so the same driver runs against a
//! real work tree, the [`DryRun`](super::dry_run::DryRun) decorator, or the
//! in-memory fake used by the unit tests.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{GitError, GixError, SweepError, SweepResult};

use super::cmd::{git_command, git_optional, git_succeeds, output_lines};

/// What HEAD points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentRef {
    /// HEAD is a symbolic ref to this branch (possibly unborn).
    Branch(String),
    /// HEAD is detached at this commit.
    Detached(String),
}

impl CurrentRef {
    /// The argument to hand to `checkout` to get back here.
    #[must_use]
    pub fn checkout_target(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Detached(name) => name,
        }
    }

    /// Branch name, if HEAD is symbolic.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::Branch(name) => Some(name),
            Self::Detached(_) => None,
        }
    }
}

impl fmt::Display for CurrentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "{name}"),
            Self::Detached(id) => write!(f, "detached HEAD at {id}"),
        }
    }
}

/// Flags for [`RepoMutation::push`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// Overwrite remote history (`--force`).
    pub force: bool,
    /// Record the pushed branch as upstream (`-u`).
    pub set_upstream: bool,
}

impl PushOptions {
    #[must_use]
    pub const fn tracking(set_upstream: bool) -> Self {
        Self {
            force: false,
            set_upstream,
        }
    }

    #[must_use]
    pub const fn force_tracking() -> Self {
        Self {
            force: true,
            set_upstream: true,
        }
    }
}

// --- Query Trait (Read-only operations) ---

/// Read-only repository queries.
pub trait RepoQuery {
    /// Work tree path this handle operates on.
    fn workdir(&self) -> &Path;

    /// Whether the path is inside a git work tree.
    fn is_repository(&self) -> bool;

    /// Branch name or detached commit id of HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be resolved.
    fn current_ref(&self) -> SweepResult<CurrentRef>;

    /// Tracked modifications, staged changes, or untracked files exist.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the status check fails.
    fn is_dirty(&self) -> SweepResult<bool>;

    /// Commit id of HEAD, `None` while HEAD is unborn.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    fn head_commit(&self) -> SweepResult<Option<String>>;

    /// Whether local branch `name` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    fn branch_exists(&self, name: &str) -> SweepResult<bool>;

    /// Whether the remote-tracking ref `<remote>/<name>` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    fn remote_branch_exists(&self, remote: &str, name: &str) -> SweepResult<bool>;

    /// Upstream of a local branch (e.g. `origin/main`), if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    fn upstream(&self, branch: &str) -> SweepResult<Option<String>>;

    /// Local branch names in the order the repository reports them.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the refs cannot be listed.
    fn list_local_branches(&self) -> SweepResult<Vec<String>>;

    /// Remote-tracking branches of `remote` as last fetched, without the
    /// `<remote>/` prefix and without the symbolic `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the refs cannot be listed.
    fn list_remote_branches(&self, remote: &str) -> SweepResult<Vec<String>>;

    /// Configured URL of a remote, `None` if the remote does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    fn remote_url(&self, name: &str) -> SweepResult<Option<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Operations that modify the repository, its refs, or the remote.
///
/// # Errors
///
/// Every method returns a `GitError` when the underlying git operation fails.
#[allow(clippy::missing_errors_doc)]
pub trait RepoMutation {
    /// Stage everything, including untracked files.
    fn stage_all(&self) -> SweepResult<()>;

    /// Commit the index. Fails with `GitError::NothingToCommit` when the index
    /// matches HEAD.
    fn commit(&self, message: &str) -> SweepResult<()>;

    /// Switch HEAD and the work tree to a branch or commit.
    fn checkout(&self, what: &str) -> SweepResult<()>;

    /// Start an unborn branch; work tree and index are left as they are.
    fn checkout_orphan(&self, name: &str) -> SweepResult<()>;

    /// Create a branch at `start` (HEAD when `None`); `force` moves an
    /// existing branch.
    fn create_branch(&self, name: &str, start: Option<&str>, force: bool) -> SweepResult<()>;

    /// Delete a local branch; `force` ignores merge status.
    fn delete_branch(&self, name: &str, force: bool) -> SweepResult<()>;

    /// Rename a branch, replacing `new` if it exists.
    fn rename_branch(&self, old: &str, new: &str) -> SweepResult<()>;

    /// Fetch from a remote, optionally pruning stale remote-tracking refs.
    fn fetch(&self, remote: &str, prune: bool) -> SweepResult<()>;

    /// `pull --rebase` the current branch from `remote`/`branch`.
    fn pull_rebase(&self, remote: &str, branch: &str) -> SweepResult<()>;

    /// Push a ref to a remote.
    fn push(&self, remote: &str, refspec: &str, options: PushOptions) -> SweepResult<()>;

    /// Delete a branch on the remote.
    fn push_delete(&self, remote: &str, branch: &str) -> SweepResult<()>;

    /// Push every local tag.
    fn push_tags(&self, remote: &str) -> SweepResult<()>;

    /// Create a lightweight tag at `target`.
    fn tag(&self, name: &str, target: &str) -> SweepResult<()>;

    /// Add a remote.
    fn add_remote(&self, name: &str, url: &str) -> SweepResult<()>;

    /// Change the URL of an existing remote.
    fn set_remote_url(&self, name: &str, url: &str) -> SweepResult<()>;
}

/// Full collaborator surface used by the workflows.
pub trait Repository: RepoQuery + RepoMutation {}

impl<T: RepoQuery + RepoMutation + ?Sized> Repository for T {}

// --- GitRepository Implementation ---

/// Handle on a work tree on disk.
///
/// Discovery, HEAD lookups and the dirty check go through gix without
/// spawning a process;
/// everything else shells out to the git CLI so that credential helpers,
/// hooks and the user's git configuration behave exactly as they do for
/// interactive git.
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
}

impl GitRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> SweepResult<gix::Repository> {
        gix::discover(&self.path)
            .map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))).into())
    }

    fn git(&self, args: &[&str]) -> SweepResult<String> {
        git_command(args, &self.path)
    }

    fn git_unit(&self, args: &[&str]) -> SweepResult<()> {
        self.git(args).map(drop)
    }

    fn refs_under(&self, prefix: &str) -> SweepResult<Vec<String>> {
        let output = self.git(&["for-each-ref", "--format=%(refname)", prefix])?;
        Ok(output_lines(&output)
            .into_iter()
            .filter_map(|name| name.strip_prefix(prefix).map(str::to_string))
            .collect())
    }
}

impl RepoQuery for GitRepository {
    fn workdir(&self) -> &Path {
        &self.path
    }

    /// Only the work tree root counts; a folder inside some enclosing
    /// repository does not.
    fn is_repository(&self) -> bool {
        let Ok(repo) = gix::discover(&self.path) else {
            return false;
        };
        let (Some(workdir), Ok(target)) = (repo.workdir(), self.path.canonicalize()) else {
            return false;
        };
        workdir.canonicalize().is_ok_and(|root| root == target)
    }

    fn current_ref(&self) -> SweepResult<CurrentRef> {
        let repo = self.open()?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;

        match head {
            Some(name) => Ok(CurrentRef::Branch(name.shorten().to_string())),
            None => self.git(&["rev-parse", "HEAD"]).map(CurrentRef::Detached),
        }
    }

    fn is_dirty(&self) -> SweepResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = self.open()?;
        let unborn = repo
            .head()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?
            .is_unborn();
        if unborn {
            // no HEAD tree to diff against; any staged or untracked file counts
            let output = self.git(&["status", "--porcelain", "--untracked-files=normal"])?;
            return Ok(!output.is_empty());
        }

        let status_failed = |e: &dyn std::fmt::Display| GitError::CommandFailed {
            command: "status".to_string(),
            message: e.to_string(),
        };
        let mut changes = repo
            .status(gix::progress::Discard)
            .map_err(|e| status_failed(&e))?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|e| status_failed(&e))?;
        Ok(changes.next().is_some())
    }

    fn head_commit(&self) -> SweepResult<Option<String>> {
        git_optional(&["rev-parse", "--verify", "--quiet", "HEAD^{commit}"], &self.path)
    }

    fn branch_exists(&self, name: &str) -> SweepResult<bool> {
        let refname = format!("refs/heads/{name}");
        git_succeeds(&["show-ref", "--verify", "--quiet", &refname], &self.path)
    }

    fn remote_branch_exists(&self, remote: &str, name: &str) -> SweepResult<bool> {
        let refname = format!("refs/remotes/{remote}/{name}");
        git_succeeds(&["show-ref", "--verify", "--quiet", &refname], &self.path)
    }

    fn upstream(&self, branch: &str) -> SweepResult<Option<String>> {
        let spec = format!("{branch}@{{upstream}}");
        git_optional(
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", &spec],
            &self.path,
        )
    }

    fn list_local_branches(&self) -> SweepResult<Vec<String>> {
        self.refs_under("refs/heads/")
    }

    fn list_remote_branches(&self, remote: &str) -> SweepResult<Vec<String>> {
        let prefix = format!("refs/remotes/{remote}/");
        Ok(self
            .refs_under(&prefix)?
            .into_iter()
            .filter(|name| name != "HEAD")
            .collect())
    }

    fn remote_url(&self, name: &str) -> SweepResult<Option<String>> {
        git_optional(&["remote", "get-url", name], &self.path)
    }
}

impl RepoMutation for GitRepository {
    fn stage_all(&self) -> SweepResult<()> {
        self.git_unit(&["add", "-A"])
    }

    fn commit(&self, message: &str) -> SweepResult<()> {
        // exit 0 means the index matches HEAD
        if git_succeeds(&["diff", "--cached", "--quiet"], &self.path)? {
            return Err(GitError::NothingToCommit.into());
        }
        self.git_unit(&["commit", "--quiet", "-m", message])
    }

    fn checkout(&self, what: &str) -> SweepResult<()> {
        self.git_unit(&["-c", "advice.detachedHead=false", "checkout", "-q", what])
            .map_err(|e| match e {
                SweepError::Git(inner) => match *inner {
                    GitError::CommandFailed { message, .. } => GitError::CheckoutFailed {
                        what: what.to_string(),
                        message,
                    }
                    .into(),
                    other => other.into(),
                },
                other => other,
            })
    }

    fn checkout_orphan(&self, name: &str) -> SweepResult<()> {
        self.git_unit(&["checkout", "-q", "--orphan", name])
    }

    fn create_branch(&self, name: &str, start: Option<&str>, force: bool) -> SweepResult<()> {
        let mut args = vec!["branch"];
        if force {
            args.push("--force");
        }
        args.push(name);
        args.extend(start);
        self.git_unit(&args)
    }

    fn delete_branch(&self, name: &str, force: bool) -> SweepResult<()> {
        let flag = if force { "-D" } else { "-d" };
        self.git_unit(&["branch", flag, name])
    }

    fn rename_branch(&self, old: &str, new: &str) -> SweepResult<()> {
        self.git_unit(&["branch", "-M", old, new])
    }

    fn fetch(&self, remote: &str, prune: bool) -> SweepResult<()> {
        let mut args = vec!["fetch", "--quiet"];
        if prune {
            args.push("--prune");
        }
        args.push(remote);
        self.git_unit(&args)
    }

    fn pull_rebase(&self, remote: &str, branch: &str) -> SweepResult<()> {
        self.git_unit(&["pull", "--rebase", "--quiet", remote, branch])
    }

    fn push(&self, remote: &str, refspec: &str, options: PushOptions) -> SweepResult<()> {
        let mut args = vec!["push", "--quiet"];
        if options.force {
            args.push("--force");
        }
        if options.set_upstream {
            args.push("--set-upstream");
        }
        args.extend([remote, refspec]);
        self.git_unit(&args)
    }

    fn push_delete(&self, remote: &str, branch: &str) -> SweepResult<()> {
        self.git_unit(&["push", "--quiet", "--delete", remote, branch])
    }

    fn push_tags(&self, remote: &str) -> SweepResult<()> {
        self.git_unit(&["push", "--quiet", "--tags", remote])
    }

    fn tag(&self, name: &str, target: &str) -> SweepResult<()> {
        self.git_unit(&["tag", name, target])
    }

    fn add_remote(&self, name: &str, url: &str) -> SweepResult<()> {
        self.git_unit(&["remote", "add", name, url])
    }

    fn set_remote_url(&self, name: &str, url: &str) -> SweepResult<()> {
        self.git_unit(&["remote", "set-url", name, url])
    }
}
