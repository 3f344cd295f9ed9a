//! In-process artifact store.

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use super::{next_updated_at, ArtifactStore};
use crate::{
    error::Result,
    models::{Project, TestCase},
};

/// Artifact store holding projects in memory.
///
/// Same semantics as [`super::SqliteStore`]; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<Vec<Project>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given projects.
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: RwLock::new(projects),
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.read().await.clone())
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn save_project(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                debug!("Updating project {}", project.id);
                let updated_at = next_updated_at(existing.updated_at);
                *existing = Project {
                    updated_at,
                    ..project.clone()
                };
            }
            None => {
                debug!("Inserting project {}", project.id);
                projects.push(project.clone());
            }
        }
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<bool> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() != before)
    }

    async fn append_test_case(&self, project_id: &str, test_case: &TestCase) -> Result<bool> {
        let mut projects = self.projects.write().await;
        let Some(project) = projects.iter_mut().find(|p| p.id == project_id) else {
            debug!("append_test_case: project {project_id} not found");
            return Ok(false);
        };
        project.test_cases.push(test_case.clone());
        project.updated_at = next_updated_at(project.updated_at);
        Ok(true)
    }
}
