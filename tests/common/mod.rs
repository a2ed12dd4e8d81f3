//! Shared fixtures for integration tests.
//!
//! A [`RemoteFixture`] is three real repositories built with the git CLI:
//! a seed repo where commits are authored, a bare repo standing in for the
//! remote, and a work clone playing the deployed tree.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Seed, bare remote and work clone under one temp dir.
pub struct RemoteFixture {
    dir: TempDir,
}

impl RemoteFixture {
    /// Create the fixture with one commit on `master` and `production`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let fixture = Self { dir };

        let seed = fixture.seed();
        std::fs::create_dir(&seed).unwrap();
        run_git(&seed, &["init"]);
        run_git(&seed, &["config", "user.email", "test@example.com"]);
        run_git(&seed, &["config", "user.name", "Test User"]);
        std::fs::write(seed.join("README.md"), "# Client\n").unwrap();
        run_git(&seed, &["add", "README.md"]);
        run_git(&seed, &["commit", "-m", "Initial commit"]);
        run_git(&seed, &["branch", "-M", "master"]);

        run_git(
            fixture.dir.path(),
            &["init", "--bare", fixture.remote().to_str().unwrap()],
        );
        run_git(&fixture.remote(), &["symbolic-ref", "HEAD", "refs/heads/master"]);
        run_git(&seed, &["remote", "add", "origin", fixture.remote().to_str().unwrap()]);
        fixture.publish("master");
        fixture.publish("production");

        run_git(
            fixture.dir.path(),
            &[
                "clone",
                fixture.remote().to_str().unwrap(),
                fixture.work().to_str().unwrap(),
            ],
        );

        fixture
    }

    /// Root of the temp dir.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Where commits are authored.
    pub fn seed(&self) -> PathBuf {
        self.dir.path().join("seed")
    }

    /// The bare remote.
    pub fn remote(&self) -> PathBuf {
        self.dir.path().join("remote.git")
    }

    /// The deployed working tree.
    pub fn work(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    /// Commit a file in the seed repo and return the new HEAD.
    pub fn commit(&self, path: &str, content: &str, message: &str) -> String {
        let seed = self.seed();
        std::fs::write(seed.join(path), content).unwrap();
        run_git(&seed, &["add", path]);
        run_git(&seed, &["commit", "-m", message]);
        rev_parse(&seed, "HEAD")
    }

    /// Push the seed's HEAD to `branch` on the remote.
    pub fn publish(&self, branch: &str) {
        run_git(
            &self.seed(),
            &["push", "--force", "origin", &format!("HEAD:refs/heads/{branch}")],
        );
    }
}

/// Run a git command in the given directory.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Resolve `rev` with git directly.
pub fn rev_parse(dir: &Path, rev: &str) -> String {
    let output = Command::new("git")
        .args(["rev-parse", rev])
        .current_dir(dir)
        .output()
        .expect("git rev-parse failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}
