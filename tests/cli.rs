use std::path::Path;

use assert_cmd::Command;
use hm::test_utils::fixtures::marketplace_seed;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn hm(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hm").unwrap();
    cmd.env("HM_ROOT", root)
        .env("HM_CONFIG", root.join("no-such-config.toml"))
        .env_remove("HM_ROBOT")
        .env_remove("HM_DB");
    cmd
}

fn robot_json(root: &Path, args: &[&str]) -> Value {
    let output = hm(root).arg("--robot").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "hm {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    json["data"].clone()
}

fn seeded_root() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    std::fs::write(
        &seed_path,
        serde_json::to_string_pretty(&marketplace_seed()).unwrap(),
    )
    .unwrap();

    let init = robot_json(dir.path(), &["init"]);
    assert_eq!(init["config_written"], true);
    assert_eq!(init["schema_version"], 3);

    let seeded = robot_json(dir.path(), &["seed", seed_path.to_str().unwrap()]);
    assert_eq!(seeded["facets"], 13);
    assert_eq!(seeded["marketers"], 4);
    dir
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("hm").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("hm").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_writes_config_and_database() {
    let dir = tempdir().unwrap();
    robot_json(dir.path(), &["init"]);
    assert!(dir.path().join("config.toml").is_file());
    assert!(dir.path().join("hm.db").is_file());

    let again = robot_json(dir.path(), &["init"]);
    assert_eq!(again["config_written"], false);
}

#[test]
fn test_init_writes_explicit_config_path() {
    let dir = tempdir().unwrap();
    let custom = dir.path().join("custom.toml");
    let init = robot_json(dir.path(), &["--config", custom.to_str().unwrap(), "init"]);
    assert_eq!(init["config_written"], true);
    assert_eq!(init["config_path"], custom.to_str().unwrap());
    assert!(custom.is_file());
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_resolve_landing_page_flow() {
    let dir = seeded_root();

    let data = robot_json(dir.path(), &["resolve", "remote", "seo"]);
    assert_eq!(data["resolution"]["outcome"], "resolved");
    assert_eq!(data["resolution"]["detail"]["skill"]["slug"], "seo");
    assert_eq!(data["resolution"]["detail"]["location"]["slug"], "remote");

    let landing = &data["landing"];
    assert_eq!(landing["canonical_path"], "/seo/remote");
    assert_eq!(landing["seo"]["title"], "SEO Specialists Remote - HeyMarketers");
    assert_eq!(landing["seo"]["structured_data"]["mainEntity"]["numberOfItems"], 1);
    assert_eq!(landing["marketers"]["total_count"], 1);
    assert_eq!(landing["marketers"]["per_page"], 20);
    assert_eq!(landing["marketers"]["items"][0]["name"], "Jane Doe");
    assert!(!landing["related"].as_array().unwrap().is_empty());
}

#[test]
fn test_resolve_reserved_path_is_invalid() {
    let dir = seeded_root();
    let data = robot_json(dir.path(), &["resolve", "/seo/jobs"]);
    assert_eq!(data["resolution"]["outcome"], "invalid");
    assert_eq!(data["resolution"]["detail"]["reason"], "reserved");
    assert_eq!(data["resolution"]["detail"]["segment"], "jobs");
    assert!(data.get("landing").is_none());
}

#[test]
fn test_search_commands() {
    let dir = seeded_root();

    let jobs = robot_json(dir.path(), &["jobs", "growth", "--sort", "relevance"]);
    assert_eq!(jobs["total_count"], 1);
    assert_eq!(jobs["items"][0]["title"], "Growth Marketing Manager");

    let marketers = robot_json(
        dir.path(),
        &["marketers", "--min-rate", "80", "--max-rate", "100"],
    );
    assert_eq!(marketers["total_count"], 2);
    assert_eq!(marketers["total_pages"], 1);

    let by_skill = robot_json(dir.path(), &["marketers", "--skill", "ppc", "--sort", "rate_desc"]);
    let names: Vec<&str> = by_skill["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Max Power", "Sam Lee"]);
}

#[test]
fn test_check_slug() {
    let dir = seeded_root();

    let conflict = robot_json(dir.path(), &["check-slug", "seo"]);
    assert_eq!(conflict["available"], false);
    assert_eq!(conflict["availability"]["status"], "facet_conflict");
    assert_eq!(conflict["availability"]["kind"], "skill");

    let taken = robot_json(dir.path(), &["check-slug", "jane-doe", "--suggest-from", "Jane Doe"]);
    assert_eq!(taken["availability"]["status"], "taken");
    assert_eq!(taken["suggestion"], "jane-doe-1");
}

#[test]
fn test_robot_error_envelope() {
    let dir = seeded_root();
    let output = hm(dir.path())
        .args(["--robot", "jobs", "--location", "atlantis"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "not_found");
}

#[test]
fn test_human_output() {
    let dir = seeded_root();
    hm(dir.path())
        .args(["jobs", "growth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Growth Marketing Manager"))
        .stdout(predicate::str::contains("$90,000 - $120,000"));

    hm(dir.path())
        .args(["resolve", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not a landing page"));
}
