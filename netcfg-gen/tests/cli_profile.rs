use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

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
fn list_shows_builtin_profiles() {
    netcfg()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- branch-mikrotik source=embedded"))
        .stdout(predicate::str::contains("- campus-cisco source=embedded"));
}

#[test]
fn save_then_apply_round_trip() {
    let dir = tempdir().expect("tempdir");
    let profiles = dir.path().join("profiles");

    netcfg()
        .args(["profile", "save"])
        .arg(fixture("fixtures/branch-mikrotik.json"))
        .args(["--name", "Branch Std", "--vendor", "mikrotik"])
        .arg("--profiles-dir")
        .arg(&profiles)
        .assert()
        .success()
        .stdout(predicate::str::contains("saved profile 'Branch Std'"));
    assert!(profiles.join("branch-std.toml").is_file());

    let out = dir.path().join("applied.json");
    netcfg()
        .args(["profile", "apply", "--name", "branch-std"])
        .arg(fixture("fixtures/campus-cisco.json"))
        .arg("--profiles-dir")
        .arg(&profiles)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("source=file:"));

    let applied: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read")).expect("json");
    assert_eq!(applied["hostname"], "campus-core-01");
    assert_eq!(applied["vlans"][0]["id"], 10);
    assert!(applied["vlans"][0].get("subnet").is_none());
    assert_eq!(applied["services"]["ssh"]["allow_password"], false);
    assert_eq!(applied["routing"]["bgp"]["local_as"], 65001);
}

#[test]
fn apply_builtin_to_default_config() {
    let output = netcfg()
        .args(["profile", "apply", "--name", "campus-cisco"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let applied: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(applied["interfaces"][0]["name"], "GigabitEthernet0/0");
    assert_eq!(applied["services"]["snmp_version"], "v3");
}

#[test]
fn apply_unknown_profile_fails() {
    netcfg()
        .args(["profile", "apply", "--name", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile 'nope' not found"));
}
