use std::sync::Arc;

use testpilot_core::{
    handle_create_project, models::Browser, params::CreateProject, Project, SqliteStore,
    StoreBuilder,
};
use tempfile::TempDir;

/// Helper function to create a store backed by a temporary database
pub async fn create_test_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = StoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, Arc::new(store))
}

/// Helper function to create a project with non-default settings
pub async fn create_test_project(store: &SqliteStore, name: &str) -> Project {
    let params = CreateProject {
        name: name.to_string(),
        description: format!("{name} end-to-end suite"),
        base_url: "https://shop.example.com".to_string(),
        repo_url: "https://github.com/example/shop-e2e".to_string(),
        git_username: "ci-bot".to_string(),
        git_email: "ci@example.com".to_string(),
        git_token: "token-123".to_string(),
        default_browser: Browser::Firefox,
        timeout: 45,
        retries: 2,
        headless: false,
        ..Default::default()
    };
    handle_create_project(store, &params)
        .await
        .expect("Failed to create project")
}
