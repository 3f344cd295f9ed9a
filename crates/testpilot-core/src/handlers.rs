//! Project operations shared by the CLI and the MCP server.
//!
//! Each handler takes the store and a params struct from [`crate::params`]
//! and returns domain objects or display wrappers, so both interfaces behave
//! identically and only differ in how they render.
//!
//! ```text
//! Interface → Handler → ArtifactStore → Models
//! ```

use jiff::Timestamp;
use log::{debug, info};

use crate::{
    display::{ProjectSummaries, TestCases},
    error::{PilotError, Result},
    models::{Project, ProjectSummary, TestCase},
    params::{CreateProject, DeleteProject, Id, ShowTestCase},
    store::ArtifactStore,
};

/// Validates and stores a new project.
///
/// # Errors
///
/// Returns `PilotError::Validation` for missing required settings, or any
/// store error.
pub async fn handle_create_project(
    store: &dyn ArtifactStore,
    params: &CreateProject,
) -> Result<Project> {
    params.validate()?;
    let project = params
        .clone()
        .into_project(store.generate_id(), Timestamp::now());
    store.save_project(&project).await?;
    info!("created project {} ({})", project.name, project.id);
    Ok(project)
}

/// Lists all projects as summaries, in creation order.
pub async fn handle_list_projects(store: &dyn ArtifactStore) -> Result<ProjectSummaries> {
    let projects = store.list_projects().await?;
    Ok(ProjectSummaries(
        projects.iter().map(ProjectSummary::from).collect(),
    ))
}

/// Loads one project with its test cases.
pub async fn handle_show_project(store: &dyn ArtifactStore, params: &Id) -> Result<Option<Project>> {
    store.get_project(&params.id).await
}

/// Deletes a project and every test case committed to it.
///
/// Returns the deleted project, or `None` if it did not exist.
///
/// # Errors
///
/// Returns `PilotError::Validation` unless `params.confirmed` is set.
pub async fn handle_delete_project(
    store: &dyn ArtifactStore,
    params: &DeleteProject,
) -> Result<Option<Project>> {
    if !params.confirmed {
        return Err(PilotError::validation("confirmed")
            .with_reason("deleting a project removes all of its test cases; confirm to proceed"));
    }

    let Some(project) = store.get_project(&params.id).await? else {
        return Ok(None);
    };
    debug!("deleting project {} with {} test cases", project.id, project.test_cases.len());
    store.delete_project(&params.id).await?;
    Ok(Some(project))
}

/// Lists the test cases of a project, or `None` if the project is unknown.
pub async fn handle_list_test_cases(
    store: &dyn ArtifactStore,
    params: &Id,
) -> Result<Option<TestCases>> {
    let project = store.get_project(&params.id).await?;
    Ok(project.map(|p| TestCases(p.test_cases)))
}

/// Loads one test case of a project.
///
/// # Errors
///
/// Returns `PilotError::ProjectNotFound` if the project is unknown.
pub async fn handle_show_test_case(
    store: &dyn ArtifactStore,
    params: &ShowTestCase,
) -> Result<Option<TestCase>> {
    let project = store
        .get_project(&params.project_id)
        .await?
        .ok_or_else(|| PilotError::ProjectNotFound {
            id: params.project_id.clone(),
        })?;
    Ok(project.test_case(&params.test_id).cloned())
}
