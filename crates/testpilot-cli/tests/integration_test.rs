//! CLI output matches the core Display implementations used by the MCP tools.

use std::{path::Path, process::Command};

use tempfile::TempDir;
use testpilot_core::{
    handle_create_project, params::CreateProject, ArtifactStore, SqliteStore, StoreBuilder,
};

async fn create_test_store() -> (SqliteStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let store = StoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to create store");
    (store, temp_dir)
}

fn run_cli_command(db_path: &Path, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_tp"))
        .env_remove("TP_BACKEND")
        .arg("--no-color")
        .arg("--database-file")
        .arg(db_path)
        .args(args)
        .output()
        .expect("Failed to run CLI command");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

#[tokio::test]
async fn test_project_display_consistency() {
    let (store, temp_dir) = create_test_store().await;
    let params = CreateProject {
        name: "Shop".to_string(),
        description: "Storefront regression suite".to_string(),
        base_url: "https://shop.example.com".to_string(),
        git_token: "secret-token".to_string(),
        ..Default::default()
    };
    let project = handle_create_project(&store, &params).await.unwrap();

    let db_path = temp_dir.path().join("test.db");
    let cli_output = run_cli_command(&db_path, &["project", "show", &project.id]);

    let stored = store.get_project(&project.id).await.unwrap().unwrap();
    assert_eq!(cli_output, stored.to_string());
    assert!(!cli_output.contains("secret-token"));
}

#[tokio::test]
async fn test_generated_test_case_visible_to_core() {
    let (store, temp_dir) = create_test_store().await;
    let params = CreateProject {
        name: "Shop".to_string(),
        base_url: "https://shop.example.com".to_string(),
        ..Default::default()
    };
    let project = handle_create_project(&store, &params).await.unwrap();
    let db_path = temp_dir.path().join("test.db");

    run_cli_command(
        &db_path,
        &[
            "generate",
            &project.id,
            "--title",
            "Login",
            "--story",
            "As a user, I want to sign in.",
        ],
    );

    let stored = store.get_project(&project.id).await.unwrap().unwrap();
    assert_eq!(stored.test_cases.len(), 1);
    let test_case = &stored.test_cases[0];
    assert_eq!(test_case.filename, "login.spec.ts");

    let cli_output = run_cli_command(&db_path, &["test", "show", &project.id, &test_case.id]);
    assert_eq!(cli_output, test_case.to_string());
}
