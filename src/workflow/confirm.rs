// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Confirmation gate for destructive operations.
//!
//! The operator has to type the literal token [`CONFIRM_TOKEN`]. Anything
//! else, including end of input, declines.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::error::{SweepError, SweepResult};

/// Literal the operator must enter to proceed.
pub const CONFIRM_TOKEN: &str = "yes";

/// Source of the operator's answer.
pub trait Confirm {
    /// Show `prompt` and return the raw answer, `None` when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn answer(&mut self, prompt: &str) -> SweepResult<Option<String>>;
}

/// Interactive prompt on stderr, answer read from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn answer(&mut self, prompt: &str) -> SweepResult<Option<String>> {
        let stdin = io::stdin();
        let stderr = io::stderr();
        Ok(prompt_line(&mut stdin.lock(), &mut stderr.lock(), prompt)?)
    }
}

/// Answer supplied up front, e.g. via `--confirm`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PresetConfirm(pub Option<String>);

impl Confirm for PresetConfirm {
    fn answer(&mut self, _prompt: &str) -> SweepResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Write `prompt`, read one line. `None` on end of input.
///
/// # Errors
///
/// Propagates I/O errors from either stream.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Whether `answer` is the confirmation token, ignoring surrounding whitespace.
#[must_use]
pub fn is_confirmed(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| a.trim() == CONFIRM_TOKEN)
}

/// Ask for confirmation and fail unless the operator typed the token.
///
/// # Errors
///
/// Returns [`SweepError::Declined`] for any other answer, or the error of the
/// underlying [`Confirm`].
pub fn require_confirmation<C: Confirm + ?Sized>(confirm: &mut C, prompt: &str) -> SweepResult<()> {
    let answer = confirm.answer(prompt)?;
    if is_confirmed(answer.as_deref()) {
        debug!("confirmation received");
        Ok(())
    } else {
        warn!("confirmation declined");
        Err(SweepError::Declined)
    }
}
