//! Typed boundary to the generation backend.
//!
//! A backend turns a feature description into a markdown test plan, and a
//! plan into one or more Playwright spec files. The pipeline never talks to a
//! backend directly: it goes through [`GenerationClient`], which enforces the
//! response contract (non-empty plan, at least one named file) so every
//! backend is held to the same rules.
//!
//! Shipped backends:
//!
//! - [`TemplateBackend`]: deterministic, offline template engine
//! - [`HttpBackend`]: JSON over HTTP to a remote service
//!
//! Backends may be non-deterministic; callers must not assume two identical
//! requests produce the same plan.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PilotError, Result},
    models::TestLanguage,
};

pub mod http;
pub mod plan;
pub mod slug;
pub mod template;

pub use http::HttpBackend;
pub use plan::{count_scenarios, parse_scenarios, Scenario};
pub use slug::{slugify, spec_filename};
pub use template::TemplateBackend;

/// Request for plan synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Natural-language feature description (user story)
    pub description: String,
    /// Test title
    pub title: String,
}

/// A synthesized test plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    /// Markdown with a title heading and a numbered list of scenarios
    pub plan_markdown: String,
    pub scenario_count: u32,
}

/// Request for code synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    /// Plan markdown, possibly edited by the operator
    pub plan: String,
    pub title: String,
    /// Application URL the suite navigates to
    pub base_url: String,
    pub language: TestLanguage,
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
}

/// Result of code synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
    pub scenario_count: u32,
}

/// A capability producing plans and code from natural-language input.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produces a test plan for a feature.
    async fn synthesize_plan(&self, request: &PlanRequest) -> Result<TestPlan>;

    /// Produces spec files for a plan.
    async fn synthesize_code(&self, request: &CodeRequest) -> Result<GeneratedCode>;
}

/// Contract-enforcing client over a [`GenerationBackend`].
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl GenerationClient {
    pub fn new<B: GenerationBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Synthesizes a plan for `title` from `description`.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::Generation` if the backend fails or returns an
    /// empty plan.
    pub async fn synthesize_plan(&self, description: &str, title: &str) -> Result<TestPlan> {
        debug!("synthesize_plan via {}: {title}", self.backend.name());
        let request = PlanRequest {
            description: description.to_string(),
            title: title.to_string(),
        };
        let plan = self.backend.synthesize_plan(&request).await?;

        if plan.plan_markdown.trim().is_empty() {
            return Err(PilotError::generation("backend returned an empty plan"));
        }
        Ok(plan)
    }

    /// Synthesizes spec files for `plan`.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::Generation` if the backend fails, returns no
    /// files, or returns a file without a name.
    pub async fn synthesize_code(
        &self,
        plan: &str,
        title: &str,
        base_url: &str,
        language: TestLanguage,
    ) -> Result<GeneratedCode> {
        debug!("synthesize_code via {}: {title}", self.backend.name());
        let request = CodeRequest {
            plan: plan.to_string(),
            title: title.to_string(),
            base_url: base_url.to_string(),
            language,
        };
        let code = self.backend.synthesize_code(&request).await?;

        if code.files.is_empty() {
            return Err(PilotError::generation("backend returned no files"));
        }
        if code.files.iter().any(|file| file.filename.trim().is_empty()) {
            return Err(PilotError::generation("backend returned a file without a name"));
        }

        let expected = spec_filename(title, language);
        if code.files[0].filename != expected {
            warn!(
                "backend {} named the spec '{}', expected '{expected}'",
                self.backend.name(),
                code.files[0].filename
            );
        }
        Ok(code)
    }
}
