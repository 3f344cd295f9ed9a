//! Data models for projects and test cases.
//!
//! Projects carry their execution settings and an embedded, ordered list of
//! test cases. Both serialize to camelCase JSON, which is also the layout the
//! artifact store persists. Display implementations live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use testpilot_core::models::{TestCase, TestCaseStatus};
//! use jiff::Timestamp;
//!
//! let test_case = TestCase {
//!     id: "tc-1".to_string(),
//!     title: "Checkout Flow".to_string(),
//!     filename: "checkout-flow.spec.ts".to_string(),
//!     content: "test('works', async () => {});".to_string(),
//!     created_at: Timestamp::now(),
//!     commit_hash: "a".repeat(40),
//!     status: TestCaseStatus::Committed,
//! };
//! let json = serde_json::to_string(&test_case).unwrap();
//! assert!(json.contains("\"commitHash\""));
//! assert!(json.contains("\"COMMITTED\""));
//! ```

pub mod project;
pub mod settings;
pub mod summary;
pub mod test_case;

#[cfg(test)]
mod tests;

pub use project::Project;
pub use settings::{Browser, ProjectType, ScreenshotPolicy, TestLanguage, VideoPolicy};
pub use summary::ProjectSummary;
pub use test_case::{TestCase, TestCaseStatus};
