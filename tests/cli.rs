//
//  devops-state
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TRACKED: &str = r#"{
  "version": 1,
  "resources": {
    "Repository": {
      "r-1": {"id": "r-1", "name": "web", "size::int": "2048"}
    },
    "PullRequest": {
      "17": {"pull_request_id::int": "17", "title": "Add login page", "status": "active"}
    }
  }
}"#;

/// `dvs` with an isolated config file and no inherited settings.
fn dvs(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dvs").unwrap();
    cmd.env("DVS_CONFIG", dir.join("config.toml"))
        .env_remove("DVS_STATE_FILE")
        .env_remove("DVS_ORG_URL")
        .env_remove("DVS_PROJECT")
        .env_remove("DVS_TOKEN")
        .env_remove("DVS_DEBUG");
    cmd
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    dvs(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dvs version "));
}

#[test]
fn test_wipe_creates_an_empty_document() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("nested").join("state.json");

    dvs(dir.path())
        .args(["state", "wipe", "--state-file"])
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wiped state file"));

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(written["version"], 1);
    assert_eq!(written["resources"]["Repository"], serde_json::json!({}));
    assert_eq!(written["resources"].as_object().unwrap().len(), 5);
}

#[test]
fn test_wipe_discards_tracked_entries() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    fs::write(&state, TRACKED).unwrap();

    dvs(dir.path())
        .args(["state", "wipe", "--state-file"])
        .arg(&state)
        .assert()
        .success();

    dvs(dir.path())
        .args(["state", "show", "--state-file"])
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracked resources"));
}

#[test]
fn test_show_lists_tracked_resources() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    fs::write(&state, TRACKED).unwrap();

    dvs(dir.path())
        .env("DVS_STATE_FILE", &state)
        .args(["state", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("Add login page"))
        .stdout(predicate::str::contains("r-1"));
}

#[test]
fn test_show_filters_by_kind_as_json() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    fs::write(&state, TRACKED).unwrap();

    let output = dvs(dir.path())
        .args(["state", "show", "--kind", "repository", "--json", "--state-file"])
        .arg(&state)
        .output()
        .unwrap();

    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["r-1"]["size::int"], "2048");
    assert!(shown.get("17").is_none());
}

#[test]
fn test_show_missing_file_is_empty_by_default() {
    let dir = TempDir::new().unwrap();

    dvs(dir.path())
        .args(["state", "show", "--state-file"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracked resources"));
}

#[test]
fn test_show_missing_file_fails_when_creation_is_disabled() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[state]\ncreate_if_missing = false\n",
    )
    .unwrap();

    dvs(dir.path())
        .args(["state", "show", "--state-file"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(9)
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn test_corrupt_state_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    fs::write(&state, r#"{"resources": {}}"#).unwrap();

    dvs(dir.path())
        .args(["state", "show", "--state-file"])
        .arg(&state)
        .assert()
        .code(9);

    assert_eq!(fs::read_to_string(&state).unwrap(), r#"{"resources": {}}"#);
}

#[test]
fn test_delete_all_requires_confirmation() {
    let dir = TempDir::new().unwrap();

    dvs(dir.path())
        .args(["state", "delete-all"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_remote_commands_need_an_organization() {
    let dir = TempDir::new().unwrap();

    dvs(dir.path())
        .args(["state", "refresh", "--project", "web", "--state-file"])
        .arg(dir.path().join("state.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("organization URL"));
}

#[test]
fn test_unknown_kind_is_a_usage_error() {
    let dir = TempDir::new().unwrap();

    dvs(dir.path())
        .args(["state", "import", "Pipeline", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown resource type"));
}

#[test]
fn test_build_wait_polls_until_completed() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let running = r#"{"id": 7, "buildNumber": "20250102.1", "status": "inProgress",
        "definition": {"id": 12, "name": "ci"}, "queueTime": "2025-01-02T03:00:00Z"}"#;
    let done = r#"{"id": 7, "buildNumber": "20250102.1", "status": "completed", "result": "succeeded",
        "definition": {"id": 12, "name": "ci"}, "queueTime": "2025-01-02T03:00:00Z",
        "finishTime": "2025-01-02T04:00:00Z"}"#;
    // The first GET fetches the build, the next two are polling checks.
    let first = server
        .mock("GET", "/web/_apis/build/builds/7")
        .match_query(mockito::Matcher::Any)
        .with_body(running)
        .expect(2)
        .create();
    let second = server
        .mock("GET", "/web/_apis/build/builds/7")
        .match_query(mockito::Matcher::Any)
        .with_body(done)
        .create();

    dvs(dir.path())
        .args(["build", "wait", "7", "--interval", "0", "--max-attempts", "3"])
        .args(["--org-url", &server.url(), "--project", "web", "--state-file"])
        .arg(dir.path().join("state.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("succeeded"));

    first.assert();
    second.assert();
}

#[test]
fn test_build_wait_gives_up_after_max_attempts() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[polling]\ninterval_secs = 0\nmax_attempts = 2\n",
    )
    .unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/web/_apis/build/builds/7")
        .match_query(mockito::Matcher::Any)
        .with_body(
            r#"{"id": 7, "buildNumber": "1", "status": "inProgress",
            "definition": {"id": 12}, "queueTime": "2025-01-02T03:00:00Z"}"#,
        )
        .create();

    dvs(dir.path())
        .args(["build", "wait", "7", "--org-url", &server.url(), "--project", "web"])
        .args(["--state-file"])
        .arg(dir.path().join("state.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("did not finish after 2 checks"));
}
