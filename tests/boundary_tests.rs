mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{write_history, write_request};
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_amount_match_is_exact() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("history.csv");
    write_history(&history, &[(7, 1, "0.0001", "2026-03-10")]).unwrap();

    let near = dir.path().join("near.json");
    write_request(&near, 1, "0.0002", "2026-03-10").unwrap();

    let mut cmd = Command::new(cargo_bin!("payment-lifecycle"));
    cmd.arg("submit")
        .arg(&near)
        .args(["--client-id", "CLIENT1", "--user-id", "USER1"])
        .arg("--history")
        .arg(&history);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"created\""));

    let same = dir.path().join("same.json");
    write_request(&same, 1, "0.000100", "2026-03-10").unwrap();

    let mut cmd = Command::new(cargo_bin!("payment-lifecycle"));
    cmd.arg("submit")
        .arg(&same)
        .args(["--client-id", "CLIENT1", "--user-id", "USER1"])
        .arg("--history")
        .arg(&history);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"payment_id\": \"7\""));
}

#[test]
fn test_window_edges() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("history.csv");
    write_history(&history, &[(7, 1, "5.00", "2026-03-07")]).unwrap();

    let request = dir.path().join("request.json");
    write_request(&request, 1, "5.00", "2026-03-10").unwrap();

    // Three days apart: outside the default one-day window
    let mut cmd = Command::new(cargo_bin!("payment-lifecycle"));
    cmd.arg("submit")
        .arg(&request)
        .args(["--client-id", "CLIENT1", "--user-id", "USER1"])
        .arg("--history")
        .arg(&history);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"created\""));

    // Exactly on the lower edge of a three-day window
    let mut cmd = Command::new(cargo_bin!("payment-lifecycle"));
    cmd.arg("submit")
        .arg(&request)
        .args(["--client-id", "CLIENT1", "--user-id", "USER1"])
        .arg("--history")
        .arg(&history)
        .args(["--window-days", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"duplicate\""));
}

#[test]
fn test_cancel_unknown_payment_is_not_found() {
    let mut cmd = Command::new(cargo_bin!("payment-lifecycle"));
    cmd.arg("cancel")
        .args(["--payment-id", "1", "--client-id", "CLIENT1", "--user-id", "USER1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("PAYMENT_NOT_FOUND"));
}

#[test]
fn test_negative_window_is_rejected() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    write_request(&request, 1, "5.00", "2026-03-10").unwrap();

    let mut cmd = Command::new(cargo_bin!("payment-lifecycle"));
    cmd.arg("submit")
        .arg(&request)
        .args(["--client-id", "CLIENT1", "--user-id", "USER1"])
        .arg("--window-days=-1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--window-days"));
}
