//! CLI integration tests.
//!
//! These run the built binary with an isolated environment so no config
//! from the host is picked up.

mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use common::{rev_parse, RemoteFixture};
use predicates::prelude::*;
use tempfile::TempDir;

/// A relaunch command whose config search can only see `home`.
fn relaunch(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("relaunch").unwrap();
    cmd.env_remove("RELAUNCH_CONFIG")
        .env("XDG_CONFIG_HOME", home.join("xdg"))
        .env("HOME", home);
    cmd
}

fn write_config(base: &Path, body: &str) {
    fs::write(base.join("relaunch.toml"), body).unwrap();
}

fn work_tree_config(fx: &RemoteFixture, launch: &str) -> String {
    format!(
        r#"
{launch}

[[tree]]
name = "app"
path = "{}"
reference = "origin/production"
"#,
        fx.work().display()
    )
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    relaunch(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("relaunch"));
}

#[test]
fn status_reports_missing_default_trees() {
    let home = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();

    relaunch(home.path())
        .args(["--base-dir", base.path().to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("runtime"))
        .stdout(predicate::str::contains("app"))
        .stdout(predicate::str::contains("checkout: missing"));

    assert!(!base.path().join("src").exists());
}

#[test]
fn status_describes_configured_tree() {
    let home = TempDir::new().unwrap();
    let fx = RemoteFixture::new();
    fs::write(fx.work().join("scratch.txt"), "untracked\n").unwrap();
    write_config(fx.root(), &work_tree_config(&fx, ""));

    relaunch(home.path())
        .args(["--base-dir", fx.root().to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("remote:   origin"))
        .stdout(predicate::str::contains("remote.git"))
        .stdout(predicate::str::contains("worktree: clean, 1 untracked"));
}

#[test]
fn sync_fails_for_missing_trees() {
    let home = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();

    relaunch(home.path())
        .args(["--base-dir", base.path().to_str().unwrap(), "sync"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("2 of 2 trees failed"));
}

#[test]
fn unknown_tree_is_rejected() {
    let home = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();

    relaunch(home.path())
        .args(["--base-dir", base.path().to_str().unwrap(), "reset", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tree 'nope'"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let home = TempDir::new().unwrap();

    relaunch(home.path())
        .args(["--config", home.path().join("absent.toml").to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn sync_updates_configured_tree() {
    let home = TempDir::new().unwrap();
    let fx = RemoteFixture::new();
    let published = fx.commit("client.py", "print('v2')\n", "Ship v2");
    fx.publish("production");
    write_config(fx.root(), &work_tree_config(&fx, ""));

    relaunch(home.path())
        .args(["--base-dir", fx.root().to_str().unwrap(), "sync", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synchronizing app"));

    assert_eq!(rev_parse(&fx.work(), "HEAD"), published);
}

#[cfg(unix)]
#[test]
fn launch_propagates_final_exit_code() {
    let home = TempDir::new().unwrap();
    let fx = RemoteFixture::new();
    let launch = r#"
[launch]
program = "sh"
args = ["-c", "echo run >> runs.log; exit 3"]
"#;
    write_config(fx.root(), &work_tree_config(&fx, launch));

    relaunch(home.path())
        .args(["--base-dir", fx.root().to_str().unwrap(), "-q"])
        .assert()
        .code(3);

    let runs = fs::read_to_string(fx.root().join("runs.log")).unwrap();
    assert_eq!(runs.lines().count(), 2);
}

#[cfg(unix)]
#[test]
fn launch_succeeds_without_retry() {
    let home = TempDir::new().unwrap();
    let fx = RemoteFixture::new();
    let launch = r#"
[launch]
program = "sh"
args = ["-c", "echo run >> runs.log"]
"#;
    write_config(fx.root(), &work_tree_config(&fx, launch));

    relaunch(home.path())
        .args(["--base-dir", fx.root().to_str().unwrap(), "launch"])
        .assert()
        .success();

    let runs = fs::read_to_string(fx.root().join("runs.log")).unwrap();
    assert_eq!(runs.lines().count(), 1);
}
