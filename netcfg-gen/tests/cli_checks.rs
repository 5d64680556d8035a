use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn netcfg() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("netcfg-gen"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn validate_passes_clean_config() {
    netcfg()
        .arg("validate")
        .arg(fixture("fixtures/branch-mikrotik.json"))
        .args(["--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No findings."))
        .stdout(predicate::str::contains("errors=0 warnings=0 info=0"));
}

#[test]
fn validate_fails_on_errors() {
    netcfg()
        .arg("validate")
        .arg(fixture("fixtures/missing-hostname.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR hostname.required [hostname]"))
        .stderr(predicate::str::contains("validate failed: 1 errors"));
}

#[test]
fn validate_warnings_fail_only_in_strict_mode() {
    netcfg()
        .arg("validate")
        .arg(fixture("fixtures/campus-cisco.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN routing.bgp.firewall [firewall.rules]"));

    netcfg()
        .arg("validate")
        .arg(fixture("fixtures/campus-cisco.json"))
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn validate_json_lists_findings() {
    let output = netcfg()
        .arg("validate")
        .arg(fixture("fixtures/campus-cisco.json"))
        .args(["--format", "json"])
        .output()
        .expect("run");
    let findings: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(findings[0]["id"], "routing.bgp.firewall");
    assert_eq!(findings[0]["severity"], "warn");
}

#[test]
fn lint_flags_missing_hostname() {
    netcfg()
        .arg("lint")
        .arg(fixture("fixtures/missing-hostname.json"))
        .args(["--vendor", "cisco"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR base.hostname.missing"));
}

#[test]
fn lint_passes_branch_config() {
    netcfg()
        .arg("lint")
        .arg(fixture("fixtures/branch-mikrotik.json"))
        .args(["--vendor", "mikrotik", "--strict"])
        .assert()
        .success();
}

#[test]
fn risk_uses_config_environment_by_default() {
    netcfg()
        .arg("risk")
        .arg(fixture("fixtures/branch-mikrotik.json"))
        .assert()
        .success()
        .stdout(predicate::str::diff("risk=LOW\n"));
}

#[test]
fn risk_reports_any_any_accept_as_high() {
    netcfg()
        .arg("risk")
        .arg(fixture("fixtures/campus-cisco.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("risk=HIGH"))
        .stdout(predicate::str::contains("- HIGH firewall.allowAny.temp-open"))
        .stdout(predicate::str::contains("- MEDIUM ssh.password"));
}

#[test]
fn risk_environment_override_raises_password_risk() {
    let output = netcfg()
        .arg("risk")
        .arg(fixture("fixtures/campus-cisco.json"))
        .args(["--environment", "prod", "--format", "json"])
        .output()
        .expect("run");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let items = report["items"].as_array().expect("items");
    let ssh = items
        .iter()
        .find(|item| item["id"] == "ssh.password")
        .expect("ssh item");
    assert_eq!(ssh["level"], "HIGH");
    assert_eq!(report["level"], "HIGH");
}
