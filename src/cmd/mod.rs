// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args + Config --> options --> GitRepository (or DryRun) --> workflow
//!                                                                   |
//!                                   stdout summary, stderr guidance <'
//! ```

pub mod config;
pub mod reset;
pub mod sync;


use crate::config::validate_name;
use crate::error::ConfigError;
use crate::workflow::StepLog;

/// Positionals never pass through config validation, so the resolved
/// names are checked before any git command runs.
fn validate_target(remote: &str, main_branch: &str) -> Result<(), ConfigError> {
    validate_name("repo", "remote", remote)?;
    validate_name("repo", "main_branch", main_branch)
}

/// One line per recorded warning, indented under a heading.
#[must_use]
pub fn warning_lines(steps: &StepLog) -> Vec<String> {
    if steps.warnings().is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "{} step(s) failed and may need to be redone by hand:",
        steps.warnings().len()
    )];
    lines.extend(steps.warnings().iter().map(|w| format!("  {w}")));
    lines
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
