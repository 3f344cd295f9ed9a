//! MCP tool handlers implementation

use std::{collections::HashMap, sync::Arc};

use log::debug;
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Deserialize;
use testpilot_core::{
    handle_create_project, handle_list_projects, handle_show_project, params as core,
    ArtifactStore, CreateResult, OperationStatus, Pipeline, PipelineBuilder,
};
use tokio::sync::Mutex;

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types stay free of MCP concerns; this transparent wrapper
// forwards deserialization and schema generation to them.

/// MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreateProject = McpParams<core::CreateProject>;
pub type RunTarget = McpParams<core::RunTarget>;
pub type SetStory = McpParams<core::SetStory>;
pub type EditPlan = McpParams<core::EditPlan>;

/// Markdown body of a successful tool call.
pub type ToolOutput = Result<String, McpError>;

/// Tool implementations over the store and the per-project runs.
///
/// Runs are opened lazily on first use and live until the server exits. The
/// map lock only covers lookup; pipeline calls run on a cloned handle so
/// `cancel` and `reset` can reach a run whose advance is still in flight.
#[derive(Clone)]
pub struct McpHandlers {
    pipelines: PipelineBuilder,
    runs: Arc<Mutex<HashMap<String, Pipeline>>>,
}

impl McpHandlers {
    pub fn new(pipelines: PipelineBuilder) -> Self {
        Self {
            pipelines,
            runs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn store(&self) -> &dyn ArtifactStore {
        self.pipelines.store().as_ref()
    }

    /// Returns the run of a project, opening it if needed.
    async fn run(&self, project_id: &str) -> Result<Pipeline, McpError> {
        let mut runs = self.runs.lock().await;
        if let Some(run) = runs.get(project_id) {
            return Ok(run.clone());
        }

        let run = self
            .pipelines
            .build(project_id)
            .await
            .map_err(|e| to_mcp_error("Failed to open run", &e))?;
        debug!("opened run for project {project_id}");
        runs.insert(project_id.to_string(), run.clone());
        Ok(run)
    }

    pub async fn create_project(&self, params: &core::CreateProject) -> ToolOutput {
        debug!("create_project: {}", params.name);

        let project = handle_create_project(self.store(), params)
            .await
            .map_err(|e| to_mcp_error("Failed to create project", &e))?;
        Ok(CreateResult::new(project).to_string())
    }

    pub async fn list_projects(&self) -> ToolOutput {
        debug!("list_projects");

        let projects = handle_list_projects(self.store())
            .await
            .map_err(|e| to_mcp_error("Failed to list projects", &e))?;
        Ok(format!("# Projects\n\n{projects}"))
    }

    pub async fn show_project(&self, params: &core::Id) -> ToolOutput {
        debug!("show_project: {}", params.id);

        let project = handle_show_project(self.store(), params)
            .await
            .map_err(|e| to_mcp_error("Failed to load project", &e))?
            .ok_or_else(|| {
                McpError::invalid_params(format!("Project with ID {} not found", params.id), None)
            })?;
        Ok(project.to_string())
    }

    pub async fn set_story(&self, params: &core::SetStory) -> ToolOutput {
        debug!("set_story: {} '{}'", params.project_id, params.title);

        let view = self
            .run(&params.project_id)
            .await?
            .set_story(&params.title, &params.description)
            .map_err(|e| to_mcp_error("Failed to set story", &e))?;
        Ok(view.to_string())
    }

    pub async fn advance(&self, params: &core::RunTarget) -> ToolOutput {
        debug!("advance: {}", params.project_id);

        let run = self.run(&params.project_id).await?;
        let view = run
            .advance()
            .await
            .map_err(|e| to_mcp_error("Failed to advance", &e))?;
        Ok(view.to_string())
    }

    pub async fn go_back(&self, params: &core::RunTarget) -> ToolOutput {
        debug!("go_back: {}", params.project_id);

        let view = self
            .run(&params.project_id)
            .await?
            .go_back()
            .map_err(|e| to_mcp_error("Failed to go back", &e))?;
        Ok(view.to_string())
    }

    pub async fn edit_plan(&self, params: &core::EditPlan) -> ToolOutput {
        debug!("edit_plan: {}", params.project_id);

        let view = self
            .run(&params.project_id)
            .await?
            .edit_plan(&params.plan)
            .map_err(|e| to_mcp_error("Failed to edit plan", &e))?;
        Ok(view.to_string())
    }

    pub async fn commit(&self, params: &core::RunTarget) -> ToolOutput {
        debug!("commit: {}", params.project_id);

        let run = self.run(&params.project_id).await?;
        let test_case = run
            .commit()
            .await
            .map_err(|e| to_mcp_error("Failed to commit", &e))?;
        Ok(CreateResult::new(test_case).to_string())
    }

    pub async fn reset(&self, params: &core::RunTarget) -> ToolOutput {
        debug!("reset: {}", params.project_id);

        Ok(self.run(&params.project_id).await?.reset().to_string())
    }

    pub async fn cancel(&self, params: &core::RunTarget) -> ToolOutput {
        debug!("cancel: {}", params.project_id);

        let run = self.run(&params.project_id).await?;
        let status = if run.cancel() {
            OperationStatus::success("Cancelled the outstanding call".to_string())
        } else if run.view().busy {
            OperationStatus::failure(
                "The commit is already being stored and can no longer be cancelled".to_string(),
            )
        } else {
            OperationStatus::failure("Nothing to cancel; no call is outstanding".to_string())
        };
        Ok(status.to_string())
    }

    pub async fn run_status(&self, params: &core::RunTarget) -> ToolOutput {
        debug!("run_status: {}", params.project_id);

        Ok(self.run(&params.project_id).await?.view().to_string())
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;
    use testpilot_core::{GenerationClient, MemoryStore, TemplateBackend};

    use super::*;

    fn handlers() -> McpHandlers {
        McpHandlers::new(PipelineBuilder::new(
            Arc::new(MemoryStore::new()),
            GenerationClient::new(TemplateBackend::new()),
        ))
    }

    async fn create_project(handlers: &McpHandlers) -> String {
        let params = core::CreateProject {
            name: "Shop".to_string(),
            base_url: "https://shop.example.com".to_string(),
            ..Default::default()
        };
        handlers.create_project(&params).await.unwrap();
        handlers
            .pipelines
            .store()
            .list_projects()
            .await
            .unwrap()
            .remove(0)
            .id
    }

    fn target(project_id: &str) -> core::RunTarget {
        core::RunTarget {
            project_id: project_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_workflow_through_tools() {
        let handlers = handlers();
        let project_id = create_project(&handlers).await;

        let story = core::SetStory {
            project_id: project_id.clone(),
            title: "Password Reset".to_string(),
            description: "As a user, I want to reset my password.".to_string(),
        };
        let output = handlers.set_story(&story).await.unwrap();
        assert!(output.contains("- Stage: STORY"));

        let output = handlers.advance(&target(&project_id)).await.unwrap();
        assert!(output.contains("- Stage: PLAN"));
        assert!(output.contains("## Test Plan: Password Reset"));

        let output = handlers.advance(&target(&project_id)).await.unwrap();
        assert!(output.contains("password-reset.spec.ts"));

        let output = handlers.commit(&target(&project_id)).await.unwrap();
        assert!(output.starts_with("Committed password-reset.spec.ts as "));

        let output = handlers.run_status(&target(&project_id)).await.unwrap();
        assert!(output.contains("- Stage: DONE"));

        let project = handlers
            .show_project(&core::Id {
                id: project_id.clone(),
            })
            .await
            .unwrap();
        assert!(project.contains("password-reset.spec.ts"));
    }

    #[tokio::test]
    async fn test_run_is_kept_per_project() {
        let handlers = handlers();
        let project_id = create_project(&handlers).await;

        let story = core::SetStory {
            project_id: project_id.clone(),
            title: "Login".to_string(),
            description: "As a user, I want to sign in.".to_string(),
        };
        handlers.set_story(&story).await.unwrap();

        let output = handlers.run_status(&target(&project_id)).await.unwrap();
        assert!(output.contains("- Title: Login"));

        let output = handlers.reset(&target(&project_id)).await.unwrap();
        assert!(!output.contains("Login"));
    }

    #[tokio::test]
    async fn test_gate_failure_is_invalid_params() {
        let handlers = handlers();
        let project_id = create_project(&handlers).await;

        let err = handlers.advance(&target(&project_id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("title"));
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let handlers = handlers();
        let err = handlers.run_status(&target("missing")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = handlers
            .show_project(&core::Id {
                id: "missing".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.message.contains("missing"));
    }

    #[tokio::test]
    async fn test_cancel_without_outstanding_call() {
        let handlers = handlers();
        let project_id = create_project(&handlers).await;

        let output = handlers.cancel(&target(&project_id)).await.unwrap();
        assert!(output.starts_with("Error: Nothing to cancel"));
    }
}
