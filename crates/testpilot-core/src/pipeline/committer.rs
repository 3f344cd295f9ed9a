//! Repository commit hook invoked by the commit transaction.

use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::{error::Result, generation::GeneratedFile, models::Project, store};

/// Pushes a committed spec to the project's repository.
#[async_trait]
pub trait RepositoryCommitter: Send + Sync {
    /// Commits `file` with `message`.
    ///
    /// Returns the commit identifier when the repository produced one. A
    /// `None` falls back to a locally generated identifier.
    async fn commit(
        &self,
        project: &Project,
        file: &GeneratedFile,
        message: &str,
    ) -> Result<Option<String>>;
}

/// Committer that pretends to push and hands back a fresh identifier.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCommitter {
    latency: Duration,
}

impl SimulatedCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl RepositoryCommitter for SimulatedCommitter {
    async fn commit(
        &self,
        project: &Project,
        file: &GeneratedFile,
        message: &str,
    ) -> Result<Option<String>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let hash = store::generate_commit_hash();
        info!(
            "simulated commit {} of {}/{} to {}@{}: {message}",
            &hash[..7],
            project.test_folder,
            file.filename,
            if project.repo_url.is_empty() {
                "<local>"
            } else {
                &project.repo_url
            },
            project.branch
        );
        Ok(Some(hash))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::params::CreateProject;

    #[tokio::test]
    async fn test_simulated_commit_returns_hash() {
        let project = CreateProject {
            name: "Shop".to_string(),
            base_url: "https://shop.test".to_string(),
            ..Default::default()
        }
        .into_project("p1".to_string(), Timestamp::now());
        let file = GeneratedFile {
            filename: "cart.spec.ts".to_string(),
            content: "test()".to_string(),
        };

        let hash = SimulatedCommitter::new()
            .commit(&project, &file, "Add cart tests")
            .await
            .unwrap()
            .unwrap();
        assert!(store::is_commit_hash(&hash));
    }
}
