//! Tests for the store module, run against both implementations.

use jiff::{Timestamp, ToSpan};
use tempfile::TempDir;

use super::*;
use crate::{
    models::TestCaseStatus,
    params::CreateProject,
};

fn sample_project(name: &str) -> Project {
    CreateProject {
        name: name.to_string(),
        base_url: "https://app.example.com".to_string(),
        ..Default::default()
    }
    .into_project(generate_id(), Timestamp::now())
}

fn sample_test_case(content: &str) -> TestCase {
    TestCase {
        id: generate_id(),
        title: "Login".to_string(),
        filename: "login.spec.ts".to_string(),
        content: content.to_string(),
        created_at: Timestamp::now(),
        commit_hash: generate_commit_hash(),
        status: TestCaseStatus::Committed,
    }
}

async fn sqlite_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = StoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("store.db")))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

async fn check_insert_order_and_lookup(store: &dyn ArtifactStore) {
    let first = sample_project("First");
    let second = sample_project("Second");
    store.save_project(&first).await.unwrap();
    store.save_project(&second).await.unwrap();

    // Updating the first project must not move it to the end.
    let mut renamed = first.clone();
    renamed.name = "First (renamed)".to_string();
    store.save_project(&renamed).await.unwrap();

    let projects = store.list_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "First (renamed)");
    assert_eq!(projects[1].id, second.id);

    assert!(store.get_project("missing").await.unwrap().is_none());
    let loaded = store.get_project(&second.id).await.unwrap().unwrap();
    assert_eq!(loaded, second);
}

async fn check_updated_at_never_decreases(store: &dyn ArtifactStore) {
    let mut project = sample_project("Clock");
    project.updated_at = Timestamp::now() + 1.hour();
    store.save_project(&project).await.unwrap();

    let stale = Project {
        updated_at: Timestamp::from_second(0).unwrap(),
        ..project.clone()
    };
    store.save_project(&stale).await.unwrap();
    let after_save = store.get_project(&project.id).await.unwrap().unwrap();
    assert!(after_save.updated_at >= project.updated_at);

    assert!(store
        .append_test_case(&project.id, &sample_test_case("X"))
        .await
        .unwrap());
    let after_append = store.get_project(&project.id).await.unwrap().unwrap();
    assert!(after_append.updated_at >= after_save.updated_at);
}

async fn check_append_to_unknown_project_is_noop(store: &dyn ArtifactStore) {
    let project = sample_project("Existing");
    store.save_project(&project).await.unwrap();
    store
        .append_test_case(&project.id, &sample_test_case("one"))
        .await
        .unwrap();

    let appended = store
        .append_test_case("no-such-project", &sample_test_case("two"))
        .await
        .expect("append to unknown project must not error");
    assert!(!appended);

    let projects = store.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].test_cases.len(), 1);
}

async fn check_append_preserves_order(store: &dyn ArtifactStore) {
    let project = sample_project("Ordered");
    store.save_project(&project).await.unwrap();
    for content in ["a", "b", "c"] {
        store
            .append_test_case(&project.id, &sample_test_case(content))
            .await
            .unwrap();
    }
    let loaded = store.get_project(&project.id).await.unwrap().unwrap();
    let contents: Vec<&str> = loaded.test_cases.iter().map(|tc| tc.content.as_str()).collect();
    assert_eq!(contents, ["a", "b", "c"]);
}

async fn check_delete(store: &dyn ArtifactStore) {
    let project = sample_project("Doomed");
    store.save_project(&project).await.unwrap();
    assert!(store.delete_project(&project.id).await.unwrap());
    assert!(!store.delete_project(&project.id).await.unwrap());
    assert!(store.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_store_contract() {
    check_insert_order_and_lookup(&MemoryStore::new()).await;
    check_updated_at_never_decreases(&MemoryStore::new()).await;
    check_append_to_unknown_project_is_noop(&MemoryStore::new()).await;
    check_append_preserves_order(&MemoryStore::new()).await;
    check_delete(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    let (_dir, store) = sqlite_store().await;
    check_insert_order_and_lookup(&store).await;
    let (_dir, store) = sqlite_store().await;
    check_updated_at_never_decreases(&store).await;
    let (_dir, store) = sqlite_store().await;
    check_append_to_unknown_project_is_noop(&store).await;
    let (_dir, store) = sqlite_store().await;
    check_append_preserves_order(&store).await;
    let (_dir, store) = sqlite_store().await;
    check_delete(&store).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sqlite_writers_share_a_file() {
    let (dir, first) = sqlite_store().await;
    let second = SqliteStore::open(dir.path().join("store.db")).await.unwrap();
    let project = sample_project("Shared");
    first.save_project(&project).await.unwrap();

    let mut writers = Vec::new();
    for (n, store) in [first.clone(), second.clone()]
        .into_iter()
        .cycle()
        .take(20)
        .enumerate()
    {
        let project_id = project.id.clone();
        writers.push(tokio::spawn(async move {
            store
                .append_test_case(&project_id, &sample_test_case(&format!("body {n}")))
                .await
        }));
    }
    for writer in writers {
        assert!(writer.await.unwrap().unwrap());
    }

    let stored = second.get_project(&project.id).await.unwrap().unwrap();
    assert_eq!(stored.test_cases.len(), 20);
    assert!(stored.updated_at >= project.updated_at);
}

#[tokio::test]
async fn test_export_import_between_stores() {
    let source = MemoryStore::new();
    let project = sample_project("Portable");
    source.save_project(&project).await.unwrap();
    source
        .append_test_case(&project.id, &sample_test_case("body"))
        .await
        .unwrap();

    let json = export_json(&source).await.unwrap();
    assert!(json.contains("\"testCases\""));

    let (_dir, target) = sqlite_store().await;
    let imported = import_json(&target, &json).await.unwrap();
    assert_eq!(imported, 1);

    let original = source.get_project(&project.id).await.unwrap().unwrap();
    let copied = target.get_project(&project.id).await.unwrap().unwrap();
    assert_eq!(copied, original);
}

#[tokio::test]
async fn test_import_rejects_malformed_json() {
    let store = MemoryStore::new();
    let err = import_json(&store, "{not json").await.unwrap_err();
    assert!(matches!(err, crate::PilotError::Serialization { .. }));
}

#[tokio::test]
async fn test_default_generators_on_trait() {
    let store = MemoryStore::new();
    assert!(is_commit_hash(&store.generate_commit_hash()));
    assert_ne!(store.generate_id(), store.generate_id());
}
