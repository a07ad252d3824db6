// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for gitsweep.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, RepoConfig, ResetConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::workflow::reset::BACKUP_TAG_PREFIX;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Repository both workflows act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    pub remote: String,
    pub main_branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            main_branch: "main".to_string(),
        }
    }
}

/// Hard reset options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResetConfig {
    /// Expected remote URL; enables remote reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Tag HEAD before rewriting.
    pub backup: bool,
    pub backup_tag_prefix: String,
    /// Push all tags at the end of the run.
    pub push_tags: bool,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            backup: true,
            backup_tag_prefix: BACKUP_TAG_PREFIX.to_string(),
            push_tags: false,
        }
    }
}

/// Reject values git would refuse as part of a ref or remote name.
pub(crate) fn validate_name(section: &str, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    };
    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid(&format!("'{value}' contains whitespace")));
    }
    if value.starts_with('-') {
        return Err(invalid(&format!("'{value}' must not start with '-'")));
    }
    Ok(())
}
