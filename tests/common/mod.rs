// gitsweep: bulk git branch maintenance
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Work tree + bare remote fixture driven by the real git CLI.

#![allow(dead_code, unreachable_pub)]

use std::path::{Path, PathBuf};
use std::process::Command;

use gitsweep::git::GitRepository;
use tempfile::TempDir;

pub const TS: &str = "20260101-120000";

pub fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct Sandbox {
    _temp: TempDir,
    pub work: PathBuf,
    pub remote: PathBuf,
}

impl Sandbox {
    /// Empty work tree on an unborn `main` with `origin` pointing at an
    /// empty bare repository.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let work = temp.path().join("work");
        let remote = temp.path().join("remote.git");
        std::fs::create_dir(&work).expect("mkdir work");
        std::fs::create_dir(&remote).expect("mkdir remote");

        git(&["init", "-q", "--bare"], &remote);
        git(&["symbolic-ref", "HEAD", "refs/heads/main"], &remote);

        git(&["init", "-q"], &work);
        git(&["symbolic-ref", "HEAD", "refs/heads/main"], &work);
        git(&["config", "user.email", "test@example.com"], &work);
        git(&["config", "user.name", "Test"], &work);
        git(&["config", "commit.gpgsign", "false"], &work);
        git(&["config", "tag.gpgsign", "false"], &work);
        let url = remote.display().to_string();
        git(&["remote", "add", "origin", &url], &work);

        Self {
            _temp: temp,
            work,
            remote,
        }
    }

    /// `main` with one commit plus the given branches, all pushed.
    pub fn published(branches: &[&str]) -> Self {
        let sandbox = Self::new();
        sandbox.commit_file("README.md", "# project\n", "initial");
        for branch in branches {
            sandbox.git(&["checkout", "-q", "-b", branch, "main"]);
            sandbox.commit_file(&format!("{branch}.txt"), branch, &format!("work on {branch}"));
        }
        sandbox.git(&["checkout", "-q", "main"]);
        sandbox.git(&["push", "-q", "--all", "-u", "origin"]);
        sandbox
    }

    pub fn repo(&self) -> GitRepository {
        GitRepository::new(&self.work)
    }

    pub fn git(&self, args: &[&str]) -> String {
        git(args, &self.work)
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.work.join(name), content).expect("write file");
    }

    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        self.write(name, content);
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
    }

    pub fn head_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn local_branches(&self) -> Vec<String> {
        lines(&self.git(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"]))
    }

    pub fn remote_branches(&self) -> Vec<String> {
        lines(&git(
            &["for-each-ref", "--format=%(refname:short)", "refs/heads/"],
            &self.remote,
        ))
    }

    pub fn remote_tags(&self) -> Vec<String> {
        lines(&git(
            &["for-each-ref", "--format=%(refname:short)", "refs/tags/"],
            &self.remote,
        ))
    }

    pub fn remote_tip(&self, branch: &str) -> String {
        git(&["rev-parse", &format!("refs/heads/{branch}")], &self.remote)
    }

    pub fn subjects(&self, rev: &str) -> Vec<String> {
        lines(&self.git(&["log", "--format=%s", rev]))
    }

    pub fn rev(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev])
    }

    pub fn is_clean(&self) -> bool {
        self.git(&["status", "--porcelain"]).is_empty()
    }
}
