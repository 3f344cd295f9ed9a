//! SQLite-backed artifact store.
//!
//! Each project row holds the JSON document of the project with its test
//! cases embedded. All rusqlite work is blocking and runs on tokio's blocking
//! pool, opening a fresh connection per call.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tokio::task;

use super::{next_updated_at, ArtifactStore};
use crate::{
    error::{DatabaseResultExt, PilotError, Result},
    models::{Project, TestCase},
};

const SELECT_ALL_SQL: &str = "SELECT document FROM projects ORDER BY position";
const SELECT_ONE_SQL: &str = "SELECT document FROM projects WHERE id = ?1";
const INSERT_SQL: &str = "INSERT INTO projects (id, position, updated_at, document) \
     VALUES (?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM projects), ?2, ?3)";
const UPDATE_SQL: &str = "UPDATE projects SET updated_at = ?2, document = ?3 WHERE id = ?1";
const DELETE_SQL: &str = "DELETE FROM projects WHERE id = ?1";

/// How long a connection waits for another writer to release the file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and document operations.
struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and initializes the schema.
    fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;
        let schema_sql = include_str!("../../assets/schema.sql");
        connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;
        Ok(Self { connection })
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_SQL)
            .db_context("Failed to prepare query")?;
        let documents = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .db_context("Failed to query projects")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read project row")?;

        documents
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(PilotError::from))
            .collect()
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let document: Option<String> = self
            .connection
            .query_row(SELECT_ONE_SQL, params![id], |row| row.get(0))
            .optional()
            .db_context("Failed to query project")?;

        document
            .map(|doc| serde_json::from_str(&doc).map_err(PilotError::from))
            .transpose()
    }

    fn save_project(&mut self, project: &Project) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let existing: Option<String> = tx
            .query_row(SELECT_ONE_SQL, params![&project.id], |row| row.get(0))
            .optional()
            .db_context("Failed to query project")?;

        match existing {
            Some(doc) => {
                let previous: Project = serde_json::from_str(&doc)?;
                let updated = Project {
                    updated_at: next_updated_at(previous.updated_at),
                    ..project.clone()
                };
                let document = serde_json::to_string(&updated)?;
                tx.execute(
                    UPDATE_SQL,
                    params![&updated.id, updated.updated_at.to_string(), document],
                )
                .db_context("Failed to update project")?;
            }
            None => {
                let document = serde_json::to_string(project)?;
                tx.execute(
                    INSERT_SQL,
                    params![&project.id, project.updated_at.to_string(), document],
                )
                .db_context("Failed to insert project")?;
            }
        }

        tx.commit().db_context("Failed to commit transaction")
    }

    fn delete_project(&self, id: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_SQL, params![id])
            .db_context("Failed to delete project")?;
        Ok(removed > 0)
    }

    /// Read-modify-write of the project document. The transaction takes the
    /// write lock before the read, so concurrent writers wait on the busy
    /// timeout instead of failing on the lock upgrade.
    fn append_test_case(&mut self, project_id: &str, test_case: &TestCase) -> Result<bool> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let existing: Option<String> = tx
            .query_row(SELECT_ONE_SQL, params![project_id], |row| row.get(0))
            .optional()
            .db_context("Failed to query project")?;

        let Some(doc) = existing else {
            return Ok(false);
        };

        let mut project: Project = serde_json::from_str(&doc)?;
        project.test_cases.push(test_case.clone());
        project.updated_at = next_updated_at(project.updated_at);

        let document = serde_json::to_string(&project)?;
        tx.execute(
            UPDATE_SQL,
            params![project_id, project.updated_at.to_string(), document],
        )
        .db_context("Failed to append test case")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(true)
    }
}

/// Artifact store persisting to a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::FileSystem` if the parent directory cannot be
    /// created, `PilotError::Database` if schema initialization fails.
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PilotError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let store = Self { db_path };
        store.blocking(|_| Ok(())).await?;
        Ok(store)
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| PilotError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

#[async_trait]
impl ArtifactStore for SqliteStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.blocking(|db| db.list_projects()).await
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let id = id.to_string();
        self.blocking(move |db| db.get_project(&id)).await
    }

    async fn save_project(&self, project: &Project) -> Result<()> {
        debug!("save_project: {}", project.id);
        let project = project.clone();
        self.blocking(move |db| db.save_project(&project)).await
    }

    async fn delete_project(&self, id: &str) -> Result<bool> {
        debug!("delete_project: {id}");
        let id = id.to_string();
        self.blocking(move |db| db.delete_project(&id)).await
    }

    async fn append_test_case(&self, project_id: &str, test_case: &TestCase) -> Result<bool> {
        debug!("append_test_case: {project_id} <- {}", test_case.id);
        let project_id = project_id.to_string();
        let test_case = test_case.clone();
        self.blocking(move |db| db.append_test_case(&project_id, &test_case))
            .await
    }
}
