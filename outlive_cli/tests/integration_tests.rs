//! Integration tests for the outlive binary.
//!
//! These tests verify end-to-end behavior including:
//! - Protocol synthesis from JSON bundles and lab CSVs
//! - Weekly plan and recovery commands
//! - Config file handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("outlive"))
}

const BUNDLE: &str = r#"{
    "profile": {
        "goals": ["muscleGain"],
        "allergies": ["fish"],
        "dietary_restrictions": []
    },
    "genomics": {
        "risks": [
            { "category": "MTHFR", "genotype": "TT", "risk_level": 0.8 }
        ]
    },
    "wearable": {
        "hrv_ms": 70.0,
        "resting_hr": 58.0,
        "sleep_hours": 8.0,
        "deep_sleep_minutes": 100.0,
        "recovery_score": 85.0,
        "strain": 5.0
    },
    "body_comp": { "weight_kg": 80.0 }
}"#;

fn write_bundle(dir: &Path) -> PathBuf {
    let path = dir.join("input.json");
    fs::write(&path, BUNDLE).expect("Failed to write bundle");
    path
}

/// Config file with defaults, so tests never read the user's config
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, "").expect("Failed to write config");
    path
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Personalized daily health protocol synthesizer",
        ));
}

#[test]
fn test_plan_json_output() {
    let temp_dir = setup_test_dir();
    let input = write_bundle(temp_dir.path());
    let config = write_config(temp_dir.path());

    let output = cli()
        .arg("plan")
        .arg("--input")
        .arg(&input)
        .arg("--date")
        .arg("2026-10-19")
        .arg("--json")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to run plan");
    assert!(output.status.success());

    let protocol: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output is not JSON");
    assert_eq!(protocol["day_of_week"], 1);
    assert_eq!(protocol["recovery_zone"], "green");

    // Monday in the muscle-gain cycle is hypertrophy
    assert_eq!(protocol["training"]["training_type"], "hypertrophy");

    let nutrition = &protocol["nutrition"];
    let macros = nutrition["protein_g"].as_u64().unwrap() * 4
        + nutrition["carbs_g"].as_u64().unwrap() * 4
        + nutrition["fat_g"].as_u64().unwrap() * 9;
    assert_eq!(nutrition["tdee"].as_u64().unwrap(), macros);

    let names: Vec<&str> = protocol["supplements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Methylfolate (5-MTHF)"));
    assert!(names.contains(&"Whey Protein"));
}

#[test]
fn test_plan_is_deterministic() {
    let temp_dir = setup_test_dir();
    let input = write_bundle(temp_dir.path());
    let config = write_config(temp_dir.path());

    let run = || {
        cli()
            .args(["plan", "--date", "2026-10-21", "--json", "--input"])
            .arg(&input)
            .arg("--config")
            .arg(&config)
            .output()
            .expect("Failed to run plan")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_plan_text_output_with_bloodwork_csv() {
    let temp_dir = setup_test_dir();
    let input = write_bundle(temp_dir.path());
    let config = write_config(temp_dir.path());

    let current = temp_dir.path().join("current.csv");
    fs::write(
        &current,
        "name,value,unit,optimal_low,optimal_high,normal_low,normal_high,status\n\
         Vitamin D,18,ng/mL,60,80,30,100,critical\n",
    )
    .unwrap();
    let previous = temp_dir.path().join("previous.csv");
    fs::write(
        &previous,
        "name,value,unit,optimal_low,optimal_high,normal_low,normal_high\n\
         25-OH Vitamin D,12,ng/mL,60,80,30,100\n",
    )
    .unwrap();

    cli()
        .arg("plan")
        .arg("--input")
        .arg(&input)
        .arg("--bloodwork")
        .arg(&current)
        .arg("--previous-bloodwork")
        .arg(&previous)
        .arg("--date")
        .arg("2026-10-19")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Top priorities"))
        .stdout(predicate::str::contains("5000-10000 IU"))
        .stdout(predicate::str::contains("Trend: Vitamin D improving"));
}

#[test]
fn test_plan_lab_date_for_bloodwork_csv() {
    let temp_dir = setup_test_dir();
    let input = write_bundle(temp_dir.path());
    let config = write_config(temp_dir.path());

    let panel = temp_dir.path().join("panel.csv");
    fs::write(
        &panel,
        "name,value,unit,optimal_low,optimal_high,normal_low,normal_high\n\
         ApoB,72,mg/dL,40,80,40,130\n",
    )
    .unwrap();

    let run = |extra: &[&str]| {
        let output = cli()
            .args(["plan", "--date", "2026-10-19", "--json", "--input"])
            .arg(&input)
            .arg("--bloodwork")
            .arg(&panel)
            .args(extra)
            .arg("--config")
            .arg(&config)
            .output()
            .expect("Failed to run plan");
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    assert!(run(&["--lab-date", "2026-09-01"]).contains("Bloodwork (2026-09-01)"));
    assert!(run(&[]).contains("Bloodwork (2026-10-19)"));

    // Without a panel there is nothing to date
    cli()
        .args(["plan", "--lab-date", "2026-09-01", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_plan_missing_input_fails() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());

    cli()
        .arg("plan")
        .arg("--input")
        .arg(temp_dir.path().join("missing.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_plan_invalid_date_fails() {
    let temp_dir = setup_test_dir();
    let input = write_bundle(temp_dir.path());
    let config = write_config(temp_dir.path());

    cli()
        .arg("plan")
        .arg("--input")
        .arg(&input)
        .arg("--date")
        .arg("19/10/2026")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_week_red_zone_json() {
    let output = cli()
        .args(["week", "--goal", "longevity", "--day", "3", "--zone", "red", "--json"])
        .output()
        .expect("Failed to run week");
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let days = plan["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[2]["focus"], "rest");
    assert_eq!(days[3]["focus"], "mobility");
    assert_eq!(days[0]["focus"], "strength");
}

#[test]
fn test_week_unknown_goal_falls_back() {
    cli()
        .args(["week", "--goal", "bulk"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown goal"))
        .stdout(predicate::str::contains("longevity"));
}

#[test]
fn test_recovery_without_signals() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());

    cli()
        .arg("recovery")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("RECOVERY: YELLOW"))
        .stdout(predicate::str::contains("No wearable data available"));
}

#[test]
fn test_recovery_green_json() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());

    let output = cli()
        .args([
            "recovery", "--hrv", "70", "--rhr", "58", "--sleep", "8", "--deep", "100",
            "--recovery-score", "85", "--strain", "5", "--json",
        ])
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to run recovery");
    assert!(output.status.success());

    let assessment: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(assessment["zone"], "green");
    assert_eq!(assessment["training_intensity_modifier"], 1.0);
    assert_eq!(assessment["confidence"], 1.0);
}

#[test]
fn test_init_config_writes_and_refuses_overwrite() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("outlive").join("config.toml");

    cli()
        .arg("init-config")
        .arg("--path")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[recovery]"));
    assert!(contents.contains("hrv_baseline_ms"));

    cli()
        .arg("init-config")
        .arg("--path")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli()
        .arg("init-config")
        .arg("--path")
        .arg(&path)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let input = write_bundle(temp_dir.path());
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[recovery]\ngreen_threshold = 0.2\nred_threshold = 0.5\n").unwrap();

    cli()
        .arg("plan")
        .arg("--input")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
