// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git CLI invocation.
//!
//! ```text
//! backend --> git_command / git_optional / git_succeeds --> git (PATH)
//! ```
//!
//! Every invocation sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`
//! so a network step fails instead of blocking on a credential prompt.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::error::{GitError, ProcessError, SweepResult};

/// Locate `git` on `PATH` once per process.
fn git_executable() -> SweepResult<&'static Path> {
    static GIT: OnceLock<Option<PathBuf>> = OnceLock::new();
    GIT.get_or_init(|| which::which("git").ok())
        .as_deref()
        .ok_or_else(|| {
            ProcessError::ExecutableNotFound {
                name: "git".to_string(),
            }
            .into()
        })
}

fn render(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

fn run(args: &[&str], cwd: &Path) -> SweepResult<Output> {
    let git = git_executable()?;
    let command = render(args);
    debug!(cwd = %cwd.display(), %command, "running");

    let output = Command::new(git)
        .args(args)
        .current_dir(cwd)
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|source| ProcessError::SpawnFailed { command, source })?;

    trace!(
        status = ?output.status.code(),
        stdout = %String::from_utf8_lossy(&output.stdout).trim(),
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "git finished"
    );
    Ok(output)
}

/// Run a git command, returning trimmed stdout.
///
/// A non-zero exit becomes `GitError::CommandFailed` carrying stderr, or
/// stdout when stderr is empty (git reports some refusals on stdout).
///
/// # Errors
///
/// Returns an error if git cannot be found or spawned, or exits non-zero.
pub fn git_command(args: &[&str], cwd: &Path) -> SweepResult<String> {
    let output = run(args, cwd)?;
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::CommandFailed {
            command: render(args),
            message: if stderr.is_empty() { stdout } else { stderr },
        }
        .into());
    }
    Ok(stdout)
}

/// Run a git query whose non-zero exit means "absent" rather than failure.
///
/// # Errors
///
/// Returns an error only if git cannot be found or spawned.
pub fn git_optional(args: &[&str], cwd: &Path) -> SweepResult<Option<String>> {
    let output = run(args, cwd)?;
    if output.status.success() {
        Ok(Some(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ))
    } else {
        Ok(None)
    }
}

/// Run a git command and report only whether it exited zero.
///
/// # Errors
///
/// Returns an error only if git cannot be found or spawned.
pub fn git_succeeds(args: &[&str], cwd: &Path) -> SweepResult<bool> {
    Ok(run(args, cwd)?.status.success())
}

/// Split command output into non-empty lines.
#[must_use]
pub fn output_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
