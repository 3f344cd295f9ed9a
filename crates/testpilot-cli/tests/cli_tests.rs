use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Command for the `tp` binary in plain mode, isolated from the caller's
/// environment
fn tp_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tp").expect("Failed to find tp binary");
    for var in [
        "TP_DATABASE_FILE",
        "TP_BACKEND",
        "TP_BACKEND_URL",
        "TP_GENERATION_TIMEOUT",
        "TP_GIT_TOKEN",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

/// Creates a project and returns its ID
fn create_project(db_path: &Path, name: &str) -> String {
    let output = tp_cmd(db_path)
        .args([
            "project",
            "create",
            name,
            "--base-url",
            "https://shop.example.com",
        ])
        .output()
        .expect("Failed to run tp");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output");
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Created project with ID: "))
        .expect("No project ID in output")
        .trim()
        .to_string()
}

#[test]
fn test_cli_create_project() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args([
            "project",
            "create",
            "Shop",
            "--base-url",
            "https://shop.example.com",
            "--description",
            "Storefront regression suite",
            "--language",
            "javascript",
            "--browser",
            "firefox",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project with ID: "))
        .stdout(predicate::str::contains("# Shop"))
        .stdout(predicate::str::contains("- Language: javascript"))
        .stdout(predicate::str::contains("- Browser: firefox (headless)"))
        .stdout(predicate::str::contains("Storefront regression suite"));
}

#[test]
fn test_cli_create_existing_project_requires_repo() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args([
            "project",
            "create",
            "Legacy",
            "--base-url",
            "https://legacy.example.com",
            "--type",
            "existing",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repo_url"));
}

#[test]
fn test_cli_list_empty_projects() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_cli_default_command_lists_projects() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = create_project(&db_path, "Shop");

    tp_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("## Shop (ID: {id})")));
}

#[test]
fn test_cli_show_unknown_project() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args(["project", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project with ID missing not found"));
}

#[test]
fn test_cli_delete_requires_confirm() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = create_project(&db_path, "Shop");

    tp_cmd(&db_path)
        .args(["project", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirm"));

    tp_cmd(&db_path)
        .args(["project", "delete", &id, "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Deleted project 'Shop' (ID: {id}) with 0 test cases"
        )));

    tp_cmd(&db_path)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_cli_generate_end_to_end() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let out_dir = temp_dir.path().join("out");
    let id = create_project(&db_path, "Shop");

    tp_cmd(&db_path)
        .args([
            "generate",
            &id,
            "--title",
            "Checkout Flow",
            "--story",
            "As a shopper, I want to pay for my cart.\n\nAcceptance Criteria:\n- Order summary is shown\n- Payment succeeds",
            "--output-dir",
        ])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Test Plan: Checkout Flow"))
        .stdout(predicate::str::contains("- Scenarios: 2"))
        .stdout(predicate::str::contains("Wrote 1 file(s)"))
        .stdout(predicate::str::contains("Committed checkout-flow.spec.ts as "));

    let spec = fs::read_to_string(out_dir.join("checkout-flow.spec.ts")).unwrap();
    assert!(spec.starts_with("import { test, expect } from '@playwright/test';"));
    assert!(spec.contains("https://shop.example.com"));

    tp_cmd(&db_path)
        .args(["test", "list", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- File: checkout-flow.spec.ts"));
}

#[test]
fn test_cli_generate_with_plan_file_and_no_commit() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let story_path = temp_dir.path().join("story.md");
    let plan_path = temp_dir.path().join("plan.md");
    let id = create_project(&db_path, "Shop");

    fs::write(&story_path, "As a user, I want to reset my password.").unwrap();
    fs::write(
        &plan_path,
        "## Test Plan: Password Reset\n\n### Test Scenarios:\n\
         1. **TC001: Request reset link**\n\
         2. **TC002: Expired link**\n\
         3. **TC003: Weak new password**\n",
    )
    .unwrap();

    tp_cmd(&db_path)
        .args(["generate", &id, "--title", "Password Reset", "--story-file"])
        .arg(&story_path)
        .arg("--plan-file")
        .arg(&plan_path)
        .arg("--no-commit")
        .assert()
        .success()
        .stdout(predicate::str::contains("- Scenarios: 3"))
        .stdout(predicate::str::contains("Weak new password"))
        .stdout(predicate::str::contains("Committed").not());

    tp_cmd(&db_path)
        .args(["test", "list", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("No test cases found."));
}

#[test]
fn test_cli_generate_requires_story() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args(["generate", "some-id", "--title", "Login"])
        .assert()
        .failure();
}

#[test]
fn test_cli_generate_unknown_project() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args(["generate", "missing", "--title", "Login", "--story", "As a user"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project with ID missing not found"));
}

#[test]
fn test_cli_http_backend_requires_url() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    tp_cmd(&db_path)
        .args(["--backend", "http", "project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--backend-url"));
}

#[test]
fn test_cli_export_import() {
    let temp_dir = create_cli_test_environment();
    let source_db = temp_dir.path().join("source.db");
    let target_db = temp_dir.path().join("target.db");
    let export_path = temp_dir.path().join("export.json");
    let id = create_project(&source_db, "Shop");

    let output = tp_cmd(&source_db)
        .args(["project", "export"])
        .output()
        .expect("Failed to run tp");
    assert!(output.status.success());
    fs::write(&export_path, &output.stdout).unwrap();

    tp_cmd(&target_db)
        .args(["project", "import"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 project"));

    tp_cmd(&target_db)
        .args(["project", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Shop"));
}
