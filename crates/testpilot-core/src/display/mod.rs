//! Markdown formatting for models, collections and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and operation outcomes get newtype wrappers so the CLI and the MCP server
//! render the same text.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrapper Types   │    │    Markdown     │
//! │ (Project, Run)  │───▶│ & Display impls │───▶│ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`ProjectSummaries`], [`TestCases`]
//! - [`results`]: [`CreateResult`], [`DeleteResult`], [`ImportResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`]
//! - [`run`]: pipeline run snapshots
//!
//! ```rust
//! use testpilot_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Run reset".to_string());
//! assert_eq!(status.to_string(), "Success: Run reset\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod run;
pub mod status;

pub use collections::{ProjectSummaries, TestCases};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, ImportResult};
pub use status::OperationStatus;
