//! Test case model definition and status.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a test case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestCaseStatus {
    /// Planned but not yet committed
    Planned,

    /// Committed to the project repository; content is immutable
    Committed,
}

impl FromStr for TestCaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PLANNED" => Ok(TestCaseStatus::Planned),
            "COMMITTED" => Ok(TestCaseStatus::Committed),
            _ => Err(format!("Invalid test case status: {s}")),
        }
    }
}

impl TestCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseStatus::Planned => "PLANNED",
            TestCaseStatus::Committed => "COMMITTED",
        }
    }

    /// Status with an icon for list display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            TestCaseStatus::Committed => "✓ Committed",
            TestCaseStatus::Planned => "○ Planned",
        }
    }
}

/// A generated browser test suite recorded against a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Unique identifier for the test case
    pub id: String,

    /// Feature title the suite was generated from
    pub title: String,

    /// Spec file name, e.g. `checkout-flow.spec.ts`
    pub filename: String,

    /// Full source of the spec file
    pub content: String,

    /// Timestamp when the test case was created (UTC)
    pub created_at: Timestamp,

    /// 40-hex identifier of the commit that recorded the file
    pub commit_hash: String,

    pub status: TestCaseStatus,
}

impl TestCase {
    pub fn is_committed(&self) -> bool {
        self.status == TestCaseStatus::Committed
    }
}
