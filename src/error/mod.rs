// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types.
//!
//! ```text
//!   collaborator / workflow                 cmd handlers, config
//!   SweepResult<T>                          anyhow::Result<T>
//!          |                                        ^
//!          v                                        |
//!     SweepError (two words) -----------------------+
//!     |- Bailed(Box<str>)    step failed, run stops
//!     |- Declined            no confirmation, nothing changed
//!     |- Git(Box<GitError>)  RepoNotFound | CommandFailed | CheckoutFailed
//!     |                      | RemoteNotFound | RebaseStopped
//!     |                      | NothingToCommit | Gix
//!     |- Process(Box<..>)    git missing from PATH, spawn failure
//!     '- Io(Box<io::Error>)  prompt I/O
//!
//!   ConfigError              InvalidValue | NotFound  (surfaced via anyhow)
//! ```

use thiserror::Error;

/// Result for command handlers and config loading.
pub type Result<T> = anyhow::Result<T>;

/// Result of repository and workflow calls.
pub type SweepResult<T> = std::result::Result<T, SweepError>;

#[derive(Debug, Error)]
pub enum SweepError {
    /// A fatal step; the message names the step and its cause.
    #[error("aborted: {0}")]
    Bailed(Box<str>),

    #[error("confirmation declined, the repository was not touched")]
    Declined,

    #[error(transparent)]
    Git(Box<GitError>),

    #[error(transparent)]
    Process(Box<ProcessError>),

    #[error("i/o error: {0}")]
    Io(Box<std::io::Error>),
}

/// A [`SweepError::Bailed`] carrying `message`.
pub fn bail_out(message: impl Into<String>) -> SweepError {
    SweepError::Bailed(message.into().into_boxed_str())
}

impl SweepError {
    #[must_use]
    pub const fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }

    /// The git failure behind this error, if it is one.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(inner) => Some(&**inner),
            _ => None,
        }
    }
}

macro_rules! boxed_from {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for SweepError {
                fn from(err: $source) -> Self {
                    Self::$variant(Box::new(err))
                }
            }
        )+
    };
}

boxed_from! {
    GitError => Git,
    ProcessError => Process,
    std::io::Error => Io,
}

/// Failures from the gix side of the backend.
#[derive(Debug, Error)]
pub enum GixError {
    #[error("repository discovery failed: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    #[error("cannot read HEAD: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository: {path}")]
    RepoNotFound { path: String },

    /// Non-zero exit; `message` is git's stderr (or stdout when stderr is empty).
    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error(transparent)]
    Gix(#[from] GixError),

    #[error("no remote named '{remote}'")]
    RemoteNotFound { remote: String },

    #[error("cannot check out {what}: {message}")]
    CheckoutFailed { what: String, message: String },

    /// `git pull --rebase` exited non-zero, possibly mid-rebase.
    #[error(
        "rebase of {branch} stopped: {message}; if a rebase is in progress, \
         resolve it or run `git rebase --abort`"
    )]
    RebaseStopped { branch: String, message: String },

    #[error("nothing to commit")]
    NothingToCommit,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    #[error("config file not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("'{name}' not found in PATH")]
    ExecutableNotFound { name: String },

    #[error("cannot run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
