//! Durable storage for projects and their committed test cases.
//!
//! The [`ArtifactStore`] trait is the contract the pipeline depends on. Two
//! implementations ship:
//!
//! - [`SqliteStore`]: one SQLite file holding each project as a JSON document
//!   with its test cases embedded, keyed by project ID
//! - [`MemoryStore`]: an in-process collection with identical semantics, used
//!   as a fake in tests
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Pipeline     │    │  ArtifactStore  │    │ SqliteStore /   │
//! │  (commit only)  │───▶│     (trait)     │───▶│  MemoryStore    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Writes are last-write-wins for `save_project`; `append_test_case` is
//! all-or-nothing per call.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    error::Result,
    models::{Project, TestCase},
};

pub mod builder;
pub mod ids;
pub mod memory;
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use builder::StoreBuilder;
pub use ids::{generate_commit_hash, generate_id, is_commit_hash};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Keyed storage for [`Project`] records and their embedded [`TestCase`]s.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Returns every project in insertion order.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Point lookup by project ID.
    async fn get_project(&self, id: &str) -> Result<Option<Project>>;

    /// Upserts by ID. Updating bumps `updated_at`; inserting appends the
    /// record as given.
    async fn save_project(&self, project: &Project) -> Result<()>;

    /// Removes a project. Returns false when no record matched.
    async fn delete_project(&self, id: &str) -> Result<bool>;

    /// Appends a test case to a project and bumps its `updated_at`.
    ///
    /// Returns false and leaves every record untouched when the project ID
    /// does not resolve.
    async fn append_test_case(&self, project_id: &str, test_case: &TestCase) -> Result<bool>;

    /// Generates an opaque record identifier.
    fn generate_id(&self) -> String {
        ids::generate_id()
    }

    /// Generates a 40-hex commit identifier.
    fn generate_commit_hash(&self) -> String {
        ids::generate_commit_hash()
    }
}

/// Next `updated_at` for a record last written at `previous`.
///
/// Never moves backwards, even if the wall clock does.
pub(crate) fn next_updated_at(previous: Timestamp) -> Timestamp {
    let now = Timestamp::now();
    if now > previous {
        now
    } else {
        previous
    }
}

/// Serializes every project of a store as a pretty JSON array.
pub async fn export_json(store: &dyn ArtifactStore) -> Result<String> {
    let projects = store.list_projects().await?;
    Ok(serde_json::to_string_pretty(&projects)?)
}

/// Upserts every project of a JSON array into a store.
///
/// Returns the number of projects imported.
pub async fn import_json(store: &dyn ArtifactStore, json: &str) -> Result<usize> {
    let projects: Vec<Project> = serde_json::from_str(json)?;
    for project in &projects {
        store.save_project(project).await?;
    }
    log::info!("Imported {} project(s)", projects.len());
    Ok(projects.len())
}
