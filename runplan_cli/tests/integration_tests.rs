//! Integration tests for the runplan binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plan validation and the schedule listing
//! - JSON rendering of workout documents
//! - Exporting to a JSONL schedule and listing it
//! - Start date resolution from the config file

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PLAN: &str = r#"WEEK,Monday,Tuesday,Wednesday,Thursday,Friday,Saturday,Sunday
1,"running: Easy Run
- warmup: 10:00
- run: 30:00 @z2
- cooldown: 5:00",,"running: Intervals
- warmup: 15:00 @z2
- repeat: 4
  - run: 2:00 @z4
  - recover: 1:30 @z1
- cooldown: 10:00 @z1",,,,"running: Long Run
- run: 16km @6:00-5:30"
2,,"cycling: Spin
- warmup: 10:00",,,,"running: Parkrun
- run: 5km",
"#;

/// Helper to create a test directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("runplan"))
}

/// Write the plan and an empty config, returning (plan path, config path)
fn write_fixture(dir: &Path, plan: &str) -> (PathBuf, PathBuf) {
    let plan_path = dir.join("plan.csv");
    let config_path = dir.join("config.toml");
    fs::write(&plan_path, plan).expect("Failed to write plan");
    fs::write(&config_path, "").expect("Failed to write config");
    (plan_path, config_path)
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Structured running workouts from CSV training plans",
        ));
}

#[test]
fn test_validate_lists_schedule() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);

    cli()
        .arg("validate")
        .arg(&plan)
        .arg("--start-date")
        .arg("2024-01-01")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid CSV with 4 workouts"))
        .stdout(predicate::str::contains("2024-01-03"))
        .stdout(predicate::str::contains("Intervals"))
        .stdout(predicate::str::contains("2024-01-13"))
        .stdout(predicate::str::contains("Spin").not());
}

#[test]
fn test_validate_verbose_shows_steps() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);

    cli()
        .arg("validate")
        .arg(&plan)
        .arg("-s")
        .arg("2024-01-01")
        .arg("--config")
        .arg(&config)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repeat x4"))
        .stdout(predicate::str::contains("recover"));
}

#[test]
fn test_validate_empty_plan() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), "WEEK,Monday\n1,\n");

    cli()
        .arg("validate")
        .arg(&plan)
        .arg("--start-date")
        .arg("2024-01-01")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts found"));
}

#[test]
fn test_render_outputs_documents() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);

    let output = cli()
        .arg("render")
        .arg(&plan)
        .arg("--start-date")
        .arg("2024-01-01")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to run render");
    assert!(output.status.success());

    let docs: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("render output is not JSON");
    let docs = docs.as_array().expect("Expected an array");
    assert_eq!(docs.len(), 4);

    let intervals = &docs[1];
    assert_eq!(intervals["date"], "2024-01-03");
    let workout = &intervals["workout"];
    assert_eq!(workout["workoutName"], "Intervals");
    assert_eq!(workout["sportType"]["sportTypeKey"], "running");

    let steps = workout["workoutSegments"][0]["workoutSteps"]
        .as_array()
        .expect("Expected steps");
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1]["type"], "RepeatGroupDTO");
    assert_eq!(steps[1]["numberOfIterations"], 4);
    assert_eq!(steps[1]["workoutSteps"][1]["stepType"]["stepTypeKey"], "recovery");
    assert_eq!(steps[2]["endConditionValue"], 600);
}

fn export(plan: &Path, config: &Path, schedule: &Path) -> assert_cmd::assert::Assert {
    cli()
        .arg("export")
        .arg(plan)
        .arg("--start-date")
        .arg("2024-01-01")
        .arg("--config")
        .arg(config)
        .arg("--output")
        .arg(schedule)
        .assert()
}

#[test]
fn test_export_writes_jsonl_once() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);
    let schedule = temp_dir.path().join("out/schedule.jsonl");

    export(&plan, &config, &schedule)
        .success()
        .stdout(predicate::str::contains("Exported 4 workouts"))
        .stdout(predicate::str::contains("Skipped").not());

    export(&plan, &config, &schedule)
        .success()
        .stdout(predicate::str::contains("Exported 0 workouts"))
        .stdout(predicate::str::contains("Skipped 4 already scheduled"));

    let content = fs::read_to_string(&schedule).expect("Failed to read schedule");
    assert_eq!(content.lines().count(), 4);
    for line in content.lines() {
        let doc: serde_json::Value = serde_json::from_str(line).expect("Invalid JSON line");
        assert!(doc["workout"]["workoutName"].is_string());
    }
}

#[test]
fn test_export_adds_new_workouts_from_edited_plan() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);
    let schedule = temp_dir.path().join("schedule.jsonl");

    export(&plan, &config, &schedule).success();

    let edited = PLAN.replace("running: Parkrun", "running: Race");
    fs::write(&plan, edited).unwrap();
    export(&plan, &config, &schedule)
        .success()
        .stdout(predicate::str::contains("Exported 1 workouts"))
        .stdout(predicate::str::contains("Skipped 3 already scheduled"));
}

#[test]
fn test_schedule_lists_exported_workouts_by_date() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);
    let schedule = temp_dir.path().join("schedule.jsonl");

    export(&plan, &config, &schedule).success();

    let output = cli()
        .arg("schedule")
        .arg("--output")
        .arg(&schedule)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to run schedule");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let easy = stdout.find("2024-01-01").expect("Easy Run missing");
    let intervals = stdout.find("2024-01-03").expect("Intervals missing");
    let long_run = stdout.find("2024-01-07").expect("Long Run missing");
    let parkrun = stdout.find("2024-01-13").expect("Parkrun missing");
    assert!(easy < intervals && intervals < long_run && long_run < parkrun);
    assert!(stdout.contains("Intervals"));
}

#[test]
fn test_schedule_empty_file() {
    let temp_dir = setup_test_dir();
    let (_, config) = write_fixture(temp_dir.path(), PLAN);

    cli()
        .arg("schedule")
        .arg("--output")
        .arg(temp_dir.path().join("none.jsonl"))
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No scheduled workouts"));
}

#[test]
fn test_start_date_from_config() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);
    fs::write(&config, "[plan]\nstart_date = \"2025-06-02\"\n").unwrap();

    cli()
        .arg("validate")
        .arg(&plan)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-06-04"));
}

#[test]
fn test_export_uses_configured_output() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);
    let schedule = temp_dir.path().join("configured.jsonl");
    fs::write(
        &config,
        format!(
            "[plan]\nstart_date = \"2024-01-01\"\n\n[export]\noutput_path = {:?}\n",
            schedule.to_string_lossy()
        ),
    )
    .unwrap();

    cli()
        .arg("export")
        .arg(&plan)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert!(schedule.exists());
}

#[test]
fn test_missing_start_date_fails() {
    let temp_dir = setup_test_dir();
    let (plan, config) = write_fixture(temp_dir.path(), PLAN);

    cli()
        .arg("validate")
        .arg(&plan)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No start date"));
}
