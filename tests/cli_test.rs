//! Integration tests for the cliweave binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn components_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("components")
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/devtool.yaml")
}

fn cliweave() -> Command {
    let mut cmd = Command::cargo_bin("cliweave").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_components_list() {
    cliweave()
        .arg("components")
        .arg("list")
        .arg("--components-dir")
        .arg(components_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("python/command_handler"))
        .stdout(predicate::str::contains("shared/setup_script"))
        .stdout(predicate::str::contains("typescript/tsconfig"));
}

#[test]
fn test_components_validate_bundled() {
    cliweave()
        .args(["components", "validate", "--components-dir"])
        .arg(components_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 invalid"));
}

#[test]
fn test_components_validate_reports_broken() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.tera"), "{% for %}").unwrap();

    cliweave()
        .args(["components", "validate", "--components-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ broken"));
}

#[test]
fn test_components_deps() {
    cliweave()
        .args(["components", "deps", "nodejs/command_handler", "--components-dir"])
        .arg(components_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("shared/generated_notice"));
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let out = TempDir::new().unwrap();

    cliweave()
        .arg("generate")
        .arg("--ir")
        .arg(fixture())
        .args(["--language", "rust"])
        .arg("--components-dir")
        .arg(components_dir())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust: 4 of 4 files generated"))
        .stdout(predicate::str::contains("src/main.rs"));

    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn test_generate_several_languages_into_subdirectories() {
    let out = TempDir::new().unwrap();

    cliweave()
        .arg("generate")
        .arg("--ir")
        .arg(fixture())
        .args(["-l", "py", "ts"])
        .arg("--components-dir")
        .arg(components_dir())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("python/pyproject.toml").is_file());
    assert!(out.path().join("typescript/cli_types.d.ts").is_file());
}

#[test]
fn test_generate_unknown_language_fails() {
    cliweave()
        .arg("generate")
        .arg("--ir")
        .arg(fixture())
        .args(["--language", "cobol", "--dry-run", "--components-dir"])
        .arg(components_dir())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unsupported language"))
        .stderr(predicate::str::contains("Generation incomplete for: cobol"));
}

#[test]
fn test_generate_missing_ir_fails() {
    cliweave()
        .args(["generate", "--ir", "/nonexistent/cli.yaml", "--language", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load IR"));
}
