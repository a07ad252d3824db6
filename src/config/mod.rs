// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitsweep.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --config FILE (in order given)
//! 3. CLI flags and positionals
//! ```
//!
//! No environment variables and no implicit config file are consulted.
//!
//! ```toml
//! [global]
//! output_log_level = 3
//! log_file = "gitsweep.log"
//!
//! [repo]
//! remote = "origin"
//! main_branch = "main"
//!
//! [reset]
//! remote_url = "git@example.com:team/repo.git"
//! backup = true
//! push_tags = false
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
pub(crate) use types::validate_name;
use types::{GlobalConfig, RepoConfig, ResetConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Target repository defaults.
    pub repo: RepoConfig,
    /// Hard reset options.
    pub reset: ResetConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitsweep::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("team.toml")
    ///     .add_toml_file("local.toml")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values that deserialize fine but git would reject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        validate_name("repo", "remote", &self.repo.remote)?;
        validate_name("repo", "main_branch", &self.repo.main_branch)?;
        validate_name("reset", "backup_tag_prefix", &self.reset.backup_tag_prefix)?;
        if let Some(url) = &self.reset.remote_url
            && url.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                section: "reset".to_string(),
                key: "remote_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_repo_options(&mut options);
        self.format_reset_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_repo_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("repo.remote".into(), self.repo.remote.clone());
        options.insert("repo.main_branch".into(), self.repo.main_branch.clone());
    }

    fn format_reset_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "reset.remote_url".into(),
            self.reset.remote_url.clone().unwrap_or_default(),
        );
        options.insert("reset.backup".into(), self.reset.backup.to_string());
        options.insert(
            "reset.backup_tag_prefix".into(),
            self.reset.backup_tag_prefix.clone(),
        );
        options.insert("reset.push_tags".into(), self.reset.push_tags.to_string());
    }
}
