//! Core library for the testpilot test generation workflow.
//!
//! A project describes an application under test. For each feature, a
//! generation run turns a user story into a markdown test plan, the plan into
//! Playwright spec files, and commits the primary spec as a test case of the
//! project.
//!
//! - [`store`]: durable projects and committed test cases
//! - [`generation`]: typed client over plan and code backends
//! - [`pipeline`]: the STORY → PLAN → CODE → DONE state machine
//! - [`handlers`]: project operations shared by every interface
//! - [`display`]: markdown rendering for all of the above
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use testpilot_core::{
//!     generation::{GenerationClient, TemplateBackend},
//!     handle_create_project,
//!     params::CreateProject,
//!     PipelineBuilder, StoreBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(
//!     StoreBuilder::new()
//!         .with_database_path(Some("testpilot.db"))
//!         .build()
//!         .await?,
//! );
//!
//! let project = handle_create_project(
//!     store.as_ref(),
//!     &CreateProject {
//!         name: "Shop".to_string(),
//!         base_url: "https://shop.example.com".to_string(),
//!         ..Default::default()
//!     },
//! )
//! .await?;
//!
//! let run = PipelineBuilder::new(store, GenerationClient::new(TemplateBackend::new()))
//!     .build(&project.id)
//!     .await?;
//! run.set_story("Login", "As a user, I want to sign in.")?;
//! run.advance().await?;
//! println!("{}", run.view());
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod models;
pub mod params;
pub mod pipeline;
pub mod store;

// Re-export commonly used types
pub use display::{
    CreateResult, DeleteResult, ImportResult, LocalDateTime, OperationStatus, ProjectSummaries,
    TestCases,
};
pub use error::{ErrorKind, PilotError, Result};
pub use generation::{GenerationBackend, GenerationClient, HttpBackend, TemplateBackend};
pub use handlers::{
    handle_create_project, handle_delete_project, handle_list_projects, handle_list_test_cases,
    handle_show_project, handle_show_test_case,
};
pub use models::{Project, ProjectSummary, TestCase, TestCaseStatus, TestLanguage};
pub use pipeline::{
    Pipeline, PipelineBuilder, PipelineConfig, RunView, SimulatedCommitter, Stage,
};
pub use store::{export_json, import_json, ArtifactStore, MemoryStore, SqliteStore, StoreBuilder};
