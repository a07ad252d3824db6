// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository access for the workflows.
//!
//! ```text
//!              workflow::{sync, reset}
//!                        |
//!                        v
//!      ,---------------------------------------,
//!      | Repository = RepoQuery + RepoMutation |
//!      '--+--------------+---------------+-----'
//!         |              |               |
//!         v              v               v
//!   GitRepository    DryRun<R>     FakeRepository
//!   gix: discover,   queries pass  in-memory model
//!        HEAD        through,      (tests only)
//!   cmd.rs: git CLI  mutations
//!        for the     logged
//!        rest
//! ```
//!
//! **`GitRepository`**: gix for discovery, HEAD and status, git CLI for everything
//! that touches the network, the index or refs.

pub mod backend;
pub mod cmd;
pub mod dry_run;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{CurrentRef, GitRepository, PushOptions, RepoMutation, RepoQuery, Repository};
pub use dry_run::DryRun;
