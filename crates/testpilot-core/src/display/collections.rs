//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{ProjectSummary, TestCase};

/// Newtype wrapper for displaying project summaries.
///
/// ```rust
/// use testpilot_core::{display::ProjectSummaries, models::{ProjectSummary, TestLanguage}};
/// use jiff::Timestamp;
///
/// let summary = ProjectSummary {
///     id: "p-1".to_string(),
///     name: "Shop".to_string(),
///     description: String::new(),
///     base_url: "https://shop.example.com".to_string(),
///     test_language: TestLanguage::TypeScript,
///     updated_at: Timestamp::now(),
///     total_tests: 0,
///     committed_tests: 0,
/// };
/// let output = ProjectSummaries(vec![summary]).to_string();
/// assert!(output.contains("## Shop (ID: p-1)"));
/// ```
pub struct ProjectSummaries(pub Vec<ProjectSummary>);

impl ProjectSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectSummary> {
        self.0.iter()
    }
}

impl Index<usize> for ProjectSummaries {
    type Output = ProjectSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a ProjectSummaries {
    type Item = &'a ProjectSummary;
    type IntoIter = std::slice::Iter<'a, ProjectSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ProjectSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No projects found.");
        }
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the test cases of a project, without their
/// source.
pub struct TestCases(pub Vec<TestCase>);

impl TestCases {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for TestCases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No test cases found.");
        }
        for test_case in &self.0 {
            test_case.fmt_entry(f)?;
        }
        Ok(())
    }
}
