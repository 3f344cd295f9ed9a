//! Project model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Browser, ProjectType, ScreenshotPolicy, TestCase, TestLanguage, VideoPolicy};

/// A project that owns the committed test cases for one application.
///
/// The execution settings are a configuration bag: the pipeline only consults
/// `base_url` and `test_language` when generating code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier for the project
    pub id: String,

    /// Display name of the project
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Whether the project targets a new or an existing repository
    #[serde(default)]
    pub project_type: ProjectType,

    /// Remote repository the tests are committed to
    #[serde(default)]
    pub repo_url: String,

    /// Branch the tests are committed to
    #[serde(default)]
    pub branch: String,

    #[serde(default)]
    pub git_username: String,

    #[serde(default)]
    pub git_email: String,

    /// Access token for the repository; never displayed
    #[serde(default)]
    pub git_token: String,

    /// Folder inside the repository holding the spec files
    #[serde(default)]
    pub test_folder: String,

    /// Application URL the generated suites navigate to
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub test_language: TestLanguage,

    #[serde(default)]
    pub default_browser: Browser,

    /// Per-test timeout in seconds
    #[serde(default)]
    pub timeout: u32,

    #[serde(default)]
    pub retries: u32,

    #[serde(default)]
    pub screenshots: ScreenshotPolicy,

    #[serde(default)]
    pub headless: bool,

    #[serde(default)]
    pub video_recording: VideoPolicy,

    /// Timestamp when the project was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last write to the project (UTC)
    pub updated_at: Timestamp,

    /// Committed test cases in creation order
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl Project {
    /// Looks up a test case by its ID.
    pub fn test_case(&self, id: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|tc| tc.id == id)
    }

    /// Number of committed test cases.
    pub fn committed_count(&self) -> usize {
        self.test_cases.iter().filter(|tc| tc.is_committed()).count()
    }
}
