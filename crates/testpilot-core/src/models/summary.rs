//! Project summary types for list display.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Project, TestLanguage};

/// Summary information about a project with test case statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project ID
    pub id: String,
    /// Display name of the project
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Application URL
    pub base_url: String,
    /// Language of generated suites
    pub test_language: TestLanguage,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of test cases
    pub total_tests: u32,
    /// Number of committed test cases
    pub committed_tests: u32,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            base_url: project.base_url.clone(),
            test_language: project.test_language,
            updated_at: project.updated_at,
            total_tests: project.test_cases.len() as u32,
            committed_tests: project.committed_count() as u32,
        }
    }
}
