//! Integration tests for the `ticketdesk` binary.
//!
//! Argument parsing, help, completions and the signed-out paths run with no
//! backend at all. The session tests point `--backend` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// A `ticketdesk` command whose config and session live under `home`.
fn ticketdesk_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ticketdesk");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("TICKETDESK_PROFILE")
        .env_remove("TICKETDESK_BACKEND")
        .env_remove("TICKETDESK_OUTPUT")
        .env_remove("TICKETDESK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_admin_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "firstname": "Grace", "lastname": "Hopper", "email": "grace@example.com"
        })))
        .mount(server)
        .await;
}

async fn mount_student_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/customers/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com"
        })))
        .mount(server)
        .await;
}

fn login(home: &TempDir, server: &MockServer, email: &str) -> std::process::Output {
    ticketdesk_cmd(home)
        .args(["--backend", &server.uri(), "login", "--email", email])
        .args(["--password-env", "TEST_LOGIN_PASSWORD"])
        .env("TEST_LOGIN_PASSWORD", "Passw0rd!")
        .output()
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = ticketdesk_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("login")
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("categories"))
            .and(predicate::str::contains("registrations")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ticketdesk"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .arg("concerts")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_list_rejects_all_with_page() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .args(["categories", "list", "--all", "--page", "2"])
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    for shell in ["bash", "zsh", "fish"] {
        ticketdesk_cmd(&home)
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("ticketdesk"));
    }
}

// ── Signed out ──────────────────────────────────────────────────────

#[test]
fn test_whoami_without_session() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .arg("whoami")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_menu_without_session() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home).arg("menu").assert().code(3);
}

#[test]
fn test_list_without_session_needs_login() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .args(["categories", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ticketdesk login"));
}

#[test]
fn test_logout_without_session_is_fine() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("No active session."));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_points_into_home() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml").and(predicate::str::contains("session.json")));
}

#[test]
fn test_config_set_then_profiles() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .args(["config", "set", "backend", "https://tickets.example.com"])
        .assert()
        .success();
    ticketdesk_cmd(&home)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *").and(predicate::str::contains("https://tickets.example.com")));
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(9);
}

#[test]
fn test_config_use_unknown_profile() {
    let home = TempDir::new().unwrap();
    ticketdesk_cmd(&home)
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_admin_login_persists_session() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_admin_login(&server).await;

    let output = login(&home, &server, "grace@example.com");
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Grace Hopper"));

    ticketdesk_cmd(&home)
        .args(["whoami", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grace@example.com").and(predicate::str::contains("admin")));

    ticketdesk_cmd(&home)
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed out."));
    ticketdesk_cmd(&home).arg("whoami").assert().code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_student_login_and_menu() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_student_login(&server).await;

    let output = login(&home, &server, "ada@example.com");
    assert!(output.status.success(), "{}", combined_output(&output));

    ticketdesk_cmd(&home)
        .args(["menu", "--output", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recommendations").and(predicate::str::contains("categories").not()));

    // Students never reach the admin screens.
    ticketdesk_cmd(&home)
        .args(["--backend", &server.uri(), "categories", "list"])
        .assert()
        .code(5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected_everywhere() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    for endpoint in ["/users/login", "/customers/login"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
    }

    let output = login(&home, &server, "nobody@example.com");
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Invalid email or password."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_admin_lists_categories_as_json() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_admin_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/categories/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Music", "description": "Live shows" },
            { "id": 2, "name": "Sports", "description": null },
            { "id": 3, "name": "Museum tours", "description": null }
        ])))
        .mount(&server)
        .await;

    assert!(login(&home, &server, "grace@example.com").status.success());

    let output = ticketdesk_cmd(&home)
        .args(["--backend", &server.uri(), "categories", "list", "--search", "mu"])
        .args(["--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Music", "Museum tours"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_refuses_when_piped() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_admin_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/categories/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Music", "description": null }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(login(&home, &server, "grace@example.com").status.success());

    ticketdesk_cmd(&home)
        .args(["--backend", &server.uri(), "categories", "delete", "7"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}
