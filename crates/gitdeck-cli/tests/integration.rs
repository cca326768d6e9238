//! Integration tests for the gitdeck CLI.
//!
//! Commands that talk to the backend run against a wiremock server.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to get gitdeck command, isolated from any config in the cwd.
fn gitdeck(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gitdeck"));
    cmd.current_dir(dir.path()).env_remove("GITDECK_LOG");
    cmd
}

/// Helper to get gitdeck command pointed at a mock backend.
fn gitdeck_at(dir: &TempDir, server: &MockServer) -> Command {
    let mut cmd = gitdeck(dir);
    cmd.args(["--url", &server.uri(), "--workspace", "ws1", "--no-input"]);
    cmd
}

async fn mount_json(server: &MockServer, verb: &str, route: &str, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(format!("/workspaces/ws1/git{route}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    gitdeck(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitdeck"));
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    gitdeck(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("checkout"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("rebase"))
        .stdout(predicate::str::contains("stash"));
}

#[test]
fn test_no_subcommand_is_usage_error() {
    let temp = TempDir::new().unwrap();
    gitdeck(&temp).assert().failure().code(2);
}

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    gitdeck(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitdeck"));
}

#[test]
fn test_missing_workspace_fails() {
    let temp = TempDir::new().unwrap();
    gitdeck(&temp)
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No workspace configured"));
}

#[test]
fn test_workspace_from_config_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join(".gitdeck.toml"),
        "[server]\nurl = \"http://127.0.0.1:1\"\nworkspace = \"ws1\"\n",
    )
    .unwrap();

    // Port 1 refuses connections: the config was read, the request failed.
    gitdeck(&temp)
        .arg("fetch")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Fetch failed"));
}

// ============================================================================
// Backend tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_status_lists_files() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/status",
        json!({
            "files": [
                { "name": "/src/lib.rs", "status": "MODIFIED" },
                { "name": "/notes.txt", "status": "UNTRACKED" }
            ],
            "clean": false
        }),
    )
    .await;
    mount_json(&server, "GET", "/branch", json!({ "name": "main" })).await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/lib.rs"))
        .stdout(predicate::str::contains("notes.txt"))
        .stdout(predicate::str::contains("main"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/status",
        json!({ "files": [{ "name": "a.txt", "status": "ADDED" }], "clean": false }),
    )
    .await;
    mount_json(&server, "GET", "/branch", json!({ "name": "main" })).await;

    let temp = TempDir::new().unwrap();
    let out = gitdeck_at(&temp, &server)
        .args(["status", "--json"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["files"][0]["status"], "ADDED");
    assert_eq!(value["is_clean"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_unknown_file_state_fails() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/status",
        json!({ "files": [{ "name": "a.txt", "status": "HAUNTED" }], "clean": false }),
    )
    .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("HAUNTED"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_nothing_to_push() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/push",
        json!({ "nothingToPush": true, "ok": false, "updates": [] }),
    )
    .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to push."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_rejected_exits_nonzero() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/push",
        json!({
            "nothingToPush": false,
            "ok": false,
            "updates": [{ "status": "REJECTED_NONFASTFORWARD" }]
        }),
    )
    .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .arg("push")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("REJECTED_NONFASTFORWARD"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_suppresses_info() {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/push", json!({ "nothingToPush": true })).await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .args(["push", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_checkout_unknown_status_fails() {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/checkout", json!({ "status": "TELEPORTED" })).await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .args(["checkout", "feature"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Checkout failed"))
        .stderr(predicate::str::contains("TELEPORTED"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_checkout_blocked_prints_hint() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/checkout",
        json!({ "status": "CONFLICTS", "conflictList": ["/src/lib.rs"] }),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/status",
        json!({ "files": [{ "name": "/src/lib.rs", "status": "MODIFIED" }], "clean": false }),
    )
    .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .args(["checkout", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/lib.rs"))
        .stdout(predicate::str::contains("gitdeck stash create"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_merge_conflicts_list_files() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/merge",
        json!({ "success": false, "status": "CONFLICTING" }),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/status",
        json!({
            "files": [
                { "name": "/src/a.rs", "status": "CONFLICTION" },
                { "name": "/README.md", "status": "MODIFIED" }
            ],
            "clean": false
        }),
    )
    .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .args(["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/a.rs"))
        .stdout(predicate::str::contains("README.md").not())
        .stdout(predicate::str::contains("gitdeck resolve"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rebase_uncommitted_changes_is_blocked() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/rebase",
        json!({ "success": false, "status": "UNCOMMITTED_CHANGES" }),
    )
    .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .args(["rebase", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uncommitted changes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_backend_error_message_is_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces/ws1/git/fetch"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "msg": "remote unreachable" })),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    gitdeck_at(&temp, &server)
        .arg("fetch")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("remote unreachable"));
}
