use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn relay_ctl() -> Command {
    let mut cmd = Command::cargo_bin("relay-ctl").unwrap();
    cmd.env_remove("RELAY_API_URL").env_remove("RELAY_API_TOKEN");
    cmd
}

#[test]
fn test_catalog_for_one_provider() {
    relay_ctl()
        .args(["catalog", "--provider", "aws"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ec2"))
        .stdout(predicate::str::contains("t3.medium"))
        .stdout(predicate::str::contains("cloud-run").not());
}

#[test]
fn test_unknown_provider_is_rejected() {
    relay_ctl()
        .args(["catalog", "--provider", "hetzner"])
        .assert()
        .failure();
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    relay_ctl()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("relays")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_estimate_rejects_incomplete_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relay.toml");
    fs::write(&path, "provider = \"aws\"\ninfrastructure_type = \"ec2\"\n").unwrap();

    relay_ctl()
        .arg("estimate")
        .arg("--file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_status_json_from_api() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/relays/deployments/d1")
        .with_status(200)
        .with_body(
            r#"{"deployment_id":"d1","status":"in_progress","progress_percent":40,
                "current_step_message":"Creating security groups"}"#,
        )
        .create();

    relay_ctl()
        .args(["status", "d1", "--json", "--api-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"in_progress\""))
        .stdout(predicate::str::contains("Creating security groups"));
    mock.assert();
}

#[test]
fn test_status_watch_json_prints_final_snapshot() {
    let polls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&polls);
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/relays/deployments/d1")
        .with_status(200)
        .with_body_from_request(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                br#"{"deployment_id":"d1","status":"in_progress","progress_percent":40}"#.to_vec()
            } else {
                br#"{"deployment_id":"d1","status":"completed","progress_percent":100,
                    "relay_id":"relay-42"}"#
                    .to_vec()
            }
        })
        .create();

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("relay.toml");
    fs::write(&config, "[deployment]\npoll_interval_secs = 1\n").unwrap();

    let output = relay_ctl()
        .arg("--config")
        .arg(&config)
        .args(["status", "d1", "--watch", "--json", "--api-url", &server.url()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let run: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(run["status"], "completed");
    assert_eq!(run["relay_id"], "relay-42");
    assert!(polls.load(Ordering::SeqCst) >= 2);
}
