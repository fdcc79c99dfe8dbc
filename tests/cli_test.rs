use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// A config whose gateways all point at a local port nothing listens on.
/// Connection refusal is immediate, so charge attempts come back `unknown`
/// without waiting out a timeout.
fn unreachable_config() -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    for section in ["credit_card", "paypal", "bank_transfer", "tokenized_card"] {
        writeln!(file, "[{section}]").unwrap();
        writeln!(file, "endpoint = \"http://127.0.0.1:9\"").unwrap();
        writeln!(file, "api_key = \"test-key\"").unwrap();
        writeln!(file, "timeout_ms = 1000").unwrap();
    }
    file
}

#[test]
fn test_missing_account_number_is_rejected_before_any_network_call() {
    let config = unreachable_config();

    let mut cmd = Command::new(cargo_bin!("paygate"));
    cmd.arg("--config")
        .arg(config.path())
        .args(["--total", "49.99", "--method", "bank_transfer"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("account_number is required"));
}

#[test]
fn test_unreachable_gateway_records_an_unknown_outcome() {
    let config = unreachable_config();

    let mut cmd = Command::new(cargo_bin!("paygate"));
    cmd.arg("--config").arg(config.path()).args([
        "--total",
        "49.99",
        "--method",
        "tokenized_card",
        "--card-token",
        "tok_visa_4242",
    ]);

    // The charge is recorded rather than raised: exit 0, outcome unknown.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"unknown\""))
        .stdout(predicate::str::contains("\"amount\": \"49.99\""));
}

#[test]
fn test_unknown_method_is_a_usage_error() {
    let config = unreachable_config();

    let mut cmd = Command::new(cargo_bin!("paygate"));
    cmd.arg("--config")
        .arg(config.path())
        .args(["--total", "10.00", "--method", "gift_card"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown payment method"));
}
