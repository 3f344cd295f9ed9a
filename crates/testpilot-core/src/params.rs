//! Parameter structures for testpilot operations
//!
//! Shared parameter structures used by every interface (CLI, MCP) without
//! framework-specific derives. Interface layers wrap or convert into these
//! types; JSON schema generation is only compiled in with the `schema`
//! feature.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PilotError, Result},
    models::{Browser, Project, ProjectType, ScreenshotPolicy, TestLanguage, VideoPolicy},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: String,
}

/// Parameters for creating a new project.
///
/// Unset settings fall back to the same defaults as the project creation
/// form: branch `main`, folder `tests`, TypeScript on Chromium, 30 second
/// timeout, no retries, screenshots on failure, headless, no video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(default)]
pub struct CreateProject {
    /// Name of the project (required)
    pub name: String,
    /// Optional description of the project
    pub description: String,
    /// Whether the project targets a new or an existing repository
    pub project_type: ProjectType,
    /// Repository URL; required for existing projects
    pub repo_url: String,
    pub branch: String,
    pub git_username: String,
    pub git_email: String,
    pub git_token: String,
    /// Folder inside the repository holding the spec files
    pub test_folder: String,
    /// Application URL the generated suites navigate to (required)
    pub base_url: String,
    pub test_language: TestLanguage,
    pub default_browser: Browser,
    /// Per-test timeout in seconds
    pub timeout: u32,
    pub retries: u32,
    pub screenshots: ScreenshotPolicy,
    pub headless: bool,
    pub video_recording: VideoPolicy,
}

impl Default for CreateProject {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            project_type: ProjectType::New,
            repo_url: String::new(),
            branch: "main".to_string(),
            git_username: String::new(),
            git_email: String::new(),
            git_token: String::new(),
            test_folder: "tests".to_string(),
            base_url: String::new(),
            test_language: TestLanguage::TypeScript,
            default_browser: Browser::Chromium,
            timeout: 30,
            retries: 0,
            screenshots: ScreenshotPolicy::OnlyOnFailure,
            headless: true,
            video_recording: VideoPolicy::Off,
        }
    }
}

impl CreateProject {
    /// Validate the required fields.
    ///
    /// # Errors
    ///
    /// * `PilotError::Validation` - When the name, base URL or test folder is
    ///   blank, or an existing project has no repository URL
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PilotError::validation("name").with_reason("Project name cannot be empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(PilotError::validation("base_url").with_reason("Base URL cannot be empty"));
        }
        if self.test_folder.trim().is_empty() {
            return Err(
                PilotError::validation("test_folder").with_reason("Test folder cannot be empty")
            );
        }
        if self.project_type == ProjectType::Existing && self.repo_url.trim().is_empty() {
            return Err(PilotError::validation("repo_url")
                .with_reason("Existing projects require a repository URL"));
        }
        Ok(())
    }

    /// Build a fresh project record with no test cases.
    pub fn into_project(self, id: String, now: Timestamp) -> Project {
        Project {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            project_type: self.project_type,
            repo_url: self.repo_url,
            branch: self.branch,
            git_username: self.git_username,
            git_email: self.git_email,
            git_token: self.git_token,
            test_folder: self.test_folder,
            base_url: self.base_url.trim().to_string(),
            test_language: self.test_language,
            default_browser: self.default_browser,
            timeout: self.timeout,
            retries: self.retries,
            screenshots: self.screenshots,
            headless: self.headless,
            video_recording: self.video_recording,
            created_at: now,
            updated_at: now,
            test_cases: Vec::new(),
        }
    }
}

/// Parameters for permanently deleting a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteProject {
    /// ID of the project to delete
    pub id: String,
    /// Must be true; deletion removes every committed test case record
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters identifying one test case of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ShowTestCase {
    pub project_id: String,
    pub test_id: String,
}

/// Parameters addressing the generation run of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RunTarget {
    /// Project whose run is driven
    pub project_id: String,
}

/// Parameters for supplying the feature story of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetStory {
    pub project_id: String,
    /// Test title, e.g. "Checkout Flow"; also names the spec file
    pub title: String,
    /// User story with optional acceptance criteria
    pub description: String,
}

/// Parameters for replacing the plan text of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct EditPlan {
    pub project_id: String,
    /// Complete markdown plan
    pub plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> CreateProject {
        CreateProject {
            name: "Shop".to_string(),
            base_url: "https://shop.example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_project_defaults() {
        let params = CreateProject::default();
        assert_eq!(params.branch, "main");
        assert_eq!(params.test_folder, "tests");
        assert_eq!(params.timeout, 30);
        assert_eq!(params.retries, 0);
        assert!(params.headless);
        assert_eq!(params.screenshots, ScreenshotPolicy::OnlyOnFailure);
    }

    #[test]
    fn test_create_project_validation() {
        assert!(valid_params().validate().is_ok());

        let mut params = valid_params();
        params.name = "   ".to_string();
        assert!(matches!(
            params.validate(),
            Err(PilotError::Validation { field, .. }) if field == "name"
        ));

        let mut params = valid_params();
        params.base_url.clear();
        assert!(matches!(
            params.validate(),
            Err(PilotError::Validation { field, .. }) if field == "base_url"
        ));

        let mut params = valid_params();
        params.project_type = ProjectType::Existing;
        assert!(matches!(
            params.validate(),
            Err(PilotError::Validation { field, .. }) if field == "repo_url"
        ));
    }

    #[test]
    fn test_create_project_deserializes_with_defaults() {
        let params: CreateProject =
            serde_json::from_str(r#"{"name": "Shop", "base_url": "https://x"}"#).unwrap();
        assert_eq!(params.branch, "main");
        assert_eq!(params.test_language, TestLanguage::TypeScript);
    }

    #[test]
    fn test_into_project() {
        let now = Timestamp::from_second(1640995200).unwrap();
        let project = valid_params().into_project("abc".to_string(), now);
        assert_eq!(project.id, "abc");
        assert_eq!(project.created_at, now);
        assert_eq!(project.updated_at, now);
        assert!(project.test_cases.is_empty());
    }
}
