//! Builder for opening generation runs.

use std::{sync::Arc, time::Duration};

use super::{Pipeline, RepositoryCommitter};
use crate::{
    error::{PilotError, Result},
    generation::GenerationClient,
    store::ArtifactStore,
};

/// Tunables applied to every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound on each backend call; unbounded when `None`
    pub generation_timeout: Option<Duration>,
}

/// Builder for [`Pipeline`] handles.
///
/// One builder is typically shared by a host and used to open a run per
/// project.
#[derive(Clone)]
pub struct PipelineBuilder {
    store: Arc<dyn ArtifactStore>,
    client: GenerationClient,
    committer: Option<Arc<dyn RepositoryCommitter>>,
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Creates a builder over a store and a generation client.
    pub fn new(store: Arc<dyn ArtifactStore>, client: GenerationClient) -> Self {
        Self {
            store,
            client,
            committer: None,
            config: PipelineConfig::default(),
        }
    }

    /// Routes commits through a repository committer.
    pub fn with_committer<C: RepositoryCommitter + 'static>(mut self, committer: C) -> Self {
        self.committer = Some(Arc::new(committer));
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Bounds each backend call.
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.generation_timeout = timeout;
        self
    }

    /// The store runs are opened against.
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Opens a fresh run targeting `project_id`.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::ProjectNotFound` if the project does not resolve,
    /// or any store error raised by the lookup.
    pub async fn build(&self, project_id: &str) -> Result<Pipeline> {
        if self.store.get_project(project_id).await?.is_none() {
            return Err(PilotError::ProjectNotFound {
                id: project_id.to_string(),
            });
        }

        Ok(Pipeline::new(
            project_id.to_string(),
            Arc::clone(&self.store),
            self.client.clone(),
            self.committer.clone(),
            self.config,
        ))
    }
}
