//! End-to-end tests for the rmk binary

mod common;

use assert_cmd::Command;
use common::create_test_config;
use predicates::prelude::*;
use std::fs;

fn rmk() -> Command {
    let mut cmd = Command::cargo_bin("rmk").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

const CHORES: &str = r#"
default: test
vars:
  sources: mypkg
tasks:
  test:
    usage: Format, lint and test
    deps: [format, lint, unittest]
  format:
    usage: Reformat sources
    run: echo format ${sources} >> log.txt
  lint:
    usage: Lint sources
    run: echo lint ${sources} >> log.txt
  unittest:
    usage: Run unit tests
    run: echo unittest >> log.txt
  broken:
    run:
      - exit 5
      - echo unreachable >> log.txt
  helper:
    private: true
    run: echo helper >> log.txt
"#;

#[test]
fn test_default_task_runs_prerequisites() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk().current_dir(temp_dir.path()).assert().success();

    let log = fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "format mypkg\nlint mypkg\nunittest\n");
}

#[test]
fn test_named_task() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .arg("lint")
        .assert()
        .success()
        .stderr(predicate::str::contains("[RUN] echo lint mypkg >> log.txt"));

    let log = fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "lint mypkg\n");
}

#[test]
fn test_failing_command_exit_code_propagates() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .arg("broken")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Command `exit 5` failed with exit code 5"));

    assert!(!temp_dir.path().join("log.txt").exists());
}

#[test]
fn test_unknown_task_has_distinct_exit_code() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .arg("doesnotexist")
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Task 'doesnotexist' is not defined"));

    assert!(!temp_dir.path().join("log.txt").exists());
}

#[test]
fn test_private_task_runs_but_is_not_listed() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("format"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("helper").not());

    rmk()
        .current_dir(temp_dir.path())
        .arg("helper")
        .assert()
        .success();
    let log = fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "helper\n");
}

#[test]
fn test_set_overrides_variables() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .args(["--set", "sources=other", "format"])
        .assert()
        .success();

    let log = fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "format other\n");
}

#[test]
fn test_env_file_variables() {
    let (temp_dir, _) = create_test_config(CHORES);
    fs::write(temp_dir.path().join(".env"), "sources=fromenv\n").unwrap();

    rmk()
        .current_dir(temp_dir.path())
        .arg("format")
        .assert()
        .success();

    let log = fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "format fromenv\n");
}

#[test]
fn test_dry_run_prints_without_running() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .args(["--dry-run", "test"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[DRY-RUN] echo unittest >> log.txt"));

    assert!(!temp_dir.path().join("log.txt").exists());
}

#[test]
fn test_explicit_file_flag() {
    let (temp_dir, config_path) = create_test_config(CHORES);
    let elsewhere = tempfile::TempDir::new().unwrap();

    rmk()
        .current_dir(elsewhere.path())
        .arg("--file")
        .arg(&config_path)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("unittest"));

    drop(temp_dir);
}

#[test]
fn test_builtin_tasks_without_task_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    rmk()
        .current_dir(temp_dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-commit"))
        .stdout(predicate::str::contains("coverage"))
        .stdout(predicate::str::contains("[format, lint, unittest]"));
}

#[test]
fn test_builtin_test_dry_run_order() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    let output = rmk()
        .current_dir(temp_dir.path())
        .args(["-n", "test"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let isort = stderr.find("isort nannyml tests").unwrap();
    let black = stderr.find("black nannyml tests").unwrap();
    let flake8 = stderr.find("flake8 nannyml tests").unwrap();
    let mypy = stderr.find("mypy nannyml tests").unwrap();
    let pytest = stderr.rfind("[DRY-RUN] pytest").unwrap();
    assert!(isort < black && black < flake8 && flake8 < mypy && mypy < pytest);
}

#[test]
fn test_cycle_in_task_file_is_a_config_error() {
    let (temp_dir, _) = create_test_config(
        r#"
tasks:
  a:
    deps: [b]
  b:
    deps: [a]
"#,
    );

    rmk()
        .current_dir(temp_dir.path())
        .arg("a")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Circular dependency detected"));
}

#[test]
fn test_completions() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    rmk()
        .current_dir(temp_dir.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rmk"));
}

#[test]
fn test_attached_short_file_flag_loads_that_file() {
    let (temp_dir, _) = create_test_config("tasks:\n  lint:\n    run: echo lint >> log.txt\n");
    fs::write(
        temp_dir.path().join("other.yml"),
        "tasks:\n  lint:\n    run: echo other >> log.txt\n",
    )
    .unwrap();

    for form in ["-fother.yml", "-f=other.yml"] {
        rmk()
            .current_dir(temp_dir.path())
            .args([form, "lint"])
            .assert()
            .success();
    }

    let log = fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "other\nother\n");
}

#[test]
fn test_unresolved_file_flag_is_rejected() {
    let (temp_dir, _) = create_test_config("tasks:\n  lint:\n    run: echo lint >> log.txt\n");
    fs::write(
        temp_dir.path().join("other.yml"),
        "tasks:\n  lint:\n    run: echo other >> log.txt\n",
    )
    .unwrap();

    rmk()
        .current_dir(temp_dir.path())
        .args(["-nfother.yml", "lint"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not resolve task file 'other.yml'"));

    assert!(!temp_dir.path().join("log.txt").exists());
}

#[test]
fn test_list_after_task_name() {
    let (temp_dir, _) = create_test_config(CHORES);

    rmk()
        .current_dir(temp_dir.path())
        .args(["lint", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available tasks:"));

    assert!(!temp_dir.path().join("log.txt").exists());
}
