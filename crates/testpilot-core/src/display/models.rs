//! Display implementations for domain models.
//!
//! Output is markdown. Credentials never appear: a project only reports
//! whether a git token is configured.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Browser, Project, ProjectSummary, ProjectType, ScreenshotPolicy, TestCase, TestCaseStatus,
    TestLanguage, VideoPolicy,
};

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    ProjectType,
    TestLanguage,
    Browser,
    ScreenshotPolicy,
    VideoPolicy,
    TestCaseStatus,
);

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Type: {}", self.project_type)?;
        if !self.repo_url.is_empty() {
            writeln!(f, "- Repository: {} ({})", self.repo_url, self.branch)?;
        }
        if !self.git_username.is_empty() || !self.git_email.is_empty() {
            writeln!(f, "- Git author: {} <{}>", self.git_username, self.git_email)?;
        }
        if !self.git_token.is_empty() {
            writeln!(f, "- Git token: configured")?;
        }
        writeln!(f, "- Base URL: {}", self.base_url)?;
        writeln!(f, "- Test folder: {}", self.test_folder)?;
        writeln!(f, "- Language: {}", self.test_language)?;
        let mode = if self.headless { "headless" } else { "headed" };
        writeln!(f, "- Browser: {} ({mode})", self.default_browser)?;
        writeln!(
            f,
            "- Timeout: {}s, retries: {}",
            self.timeout, self.retries
        )?;
        writeln!(f, "- Screenshots: {}", self.screenshots)?;
        writeln!(f, "- Video: {}", self.video_recording)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        if self.test_cases.is_empty() {
            writeln!(f, "\nNo test cases committed yet.")?;
        } else {
            writeln!(f, "\n## Test Cases")?;
            writeln!(f)?;
            for test_case in &self.test_cases {
                test_case.fmt_entry(f)?;
            }
        }

        Ok(())
    }
}

impl TestCase {
    /// Heading and metadata, without the source.
    pub(crate) fn fmt_entry(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.title, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- File: {}", self.filename)?;
        writeln!(f, "- Commit: {}", self.commit_hash)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }

    fn fence_language(&self) -> &'static str {
        if self.filename.ends_with(".ts") {
            "typescript"
        } else {
            "javascript"
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_entry(f)?;
        writeln!(f, "```{}", self.fence_language())?;
        write!(f, "{}", self.content)?;
        if !self.content.ends_with('\n') {
            writeln!(f)?;
        }
        writeln!(f, "```")
    }
}

impl fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_tests > 0 {
            format!(" ({}/{} committed)", self.committed_tests, self.total_tests)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.name, self.id)?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "- **Description**: {}", self.description)?;
        }
        writeln!(f, "- **Base URL**: {}", self.base_url)?;
        writeln!(f, "- **Language**: {}", self.test_language)?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)
    }
}
