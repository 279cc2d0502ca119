//! Integration tests for the `myhome` CLI binary.
//!
//! Argument parsing, help output, shell completions and configuration
//! errors run without any server; the session tests point the binary at
//! a wiremock Home Assistant.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GW: &str = "00:03:50:aa:bb:cc";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `myhome` binary with env isolation.
///
/// Clears all `MYHOME_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn myhome_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("myhome");
    cmd.env("HOME", "/tmp/myhome-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/myhome-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("MYHOME_PROFILE")
        .env_remove("MYHOME_URL")
        .env_remove("MYHOME_TOKEN")
        .env_remove("MYHOME_GATEWAY")
        .env_remove("MYHOME_OUTPUT")
        .env_remove("MYHOME_INSECURE")
        .env_remove("MYHOME_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// A Home Assistant with one gateway, one configured light and one
/// pending light at address 12.
async fn home_assistant() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/myhome/gateways"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gateways": [{
                "mac": GW,
                "name": "MH202",
                "host": "192.168.1.35",
                "discovery_by_activation": false
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/myhome/discovery_by_activation"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "gateway": GW, "enabled": true })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/myhome/activation_discovery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "activation_discovery",
            "gateway": GW,
            "enabled": true,
            "new_light": ["12"],
            "new_cover": [],
            "new_climate": [],
            "new_power": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/myhome/configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gateway": GW,
            "devices": {
                "light": [{ "key": "kitchen", "name": "Kitchen", "where": "11", "dimmable": true }],
                "cover": [],
                "climate": [],
                "sensor": []
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/myhome/configuration/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "gateway": GW,
            "platform": "light",
            "key": "discovered_light_12"
        })))
        .mount(&server)
        .await;

    server
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut cmd = myhome_cmd();
    cmd.args(["--url", &server.uri(), "--token", "test-token"])
        .args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = myhome_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    myhome_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("MyHOME")
            .and(predicate::str::contains("gateways"))
            .and(predicate::str::contains("discovery"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    myhome_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("myhome"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    myhome_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    myhome_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = myhome_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_without_config() {
    myhome_cmd()
        .args(["devices", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_url_without_token() {
    myhome_cmd()
        .args(["--url", "http://127.0.0.1:9", "gateways", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No access token"));
}

#[test]
fn test_invalid_url() {
    myhome_cmd()
        .args(["--url", "not a url", "--token", "t", "gateways", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn test_invalid_output_format() {
    let output = myhome_cmd()
        .args(["--output", "invalid", "gateways", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_malformed_draft_edit_is_a_usage_error() {
    let output = myhome_cmd()
        .args(["discovery", "import", "--set", "light:12"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--set"));
}

#[test]
fn test_config_show_without_config() {
    myhome_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    myhome_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_discovery_subcommands_exist() {
    myhome_cmd()
        .args(["discovery", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("show")
                .and(predicate::str::contains("clear"))
                .and(predicate::str::contains("import")),
        );
}

#[test]
fn test_import_flags_exist() {
    myhome_cmd()
        .args(["discovery", "import", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--only")
                .and(predicate::str::contains("--skip"))
                .and(predicate::str::contains("--set")),
        );
}

// ── Sessions against a mock Home Assistant ──────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_gateways_list_json() {
    let server = home_assistant().await;
    let output = run_against(&server, &["-o", "json", "gateways", "list"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let gateways: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(gateways[0]["mac"], GW);
    // The session turned passive discovery on while loading.
    assert_eq!(gateways[0]["discovery_by_activation"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_gateway_is_not_found() {
    let server = home_assistant().await;
    let output = run_against(&server, &["--gateway", "ff:ff", "gateways", "list"]).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("ff:ff"));

    // Only the gateway list was read; no gateway was synced or written to.
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.iter().all(|r| r.url.path() == "/api/myhome/gateways"),
        "unexpected requests: {:?}",
        requests.iter().map(|r| r.url.path().to_owned()).collect::<Vec<_>>()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gateway_flag_ignores_mac_case() {
    let server = home_assistant().await;
    let output = run_against(
        &server,
        &["--gateway", "00:03:50:AA:BB:CC", "-o", "plain", "devices", "list"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "light:kitchen");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_plain() {
    let server = home_assistant().await;
    let output = run_against(&server, &["-o", "plain", "devices", "list"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "light:kitchen");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_discovery_show_lists_pending_candidates() {
    let server = home_assistant().await;
    let output = run_against(&server, &["-o", "plain", "discovery", "show"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "light:12");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_discovery_import_reports_server_keys() {
    let server = home_assistant().await;
    let output = run_against(&server, &["-o", "json", "discovery", "import"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["candidate"], "light:12");
    assert_eq!(rows[0]["status"], "imported");
    assert_eq!(rows[0]["result"], "light:discovered_light_12");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Import completed: 1 devices."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_discovery_import_rejects_unknown_candidate() {
    let server = home_assistant().await;
    let output = run_against(&server, &["discovery", "import", "--only", "cover:99"]).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("cover:99"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_discovery_import_with_everything_skipped() {
    let server = home_assistant().await;
    let output = run_against(&server, &["discovery", "import", "--skip", "light:12"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No selected devices to import."));
}
