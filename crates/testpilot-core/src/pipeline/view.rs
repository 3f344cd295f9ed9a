//! Snapshot of a run as seen by the workflow host.

use serde::Serialize;

use super::Stage;
use crate::{
    error::{ErrorKind, PilotError},
    generation::GeneratedFile,
};

/// Most recent failure of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&PilotError> for LastError {
    fn from(err: &PilotError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Read-only view of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunView {
    pub project_id: String,
    pub stage: Stage,
    /// Whether the gate out of the current stage is satisfied
    pub can_advance: bool,
    /// Whether a generation or commit call is outstanding
    pub busy: bool,
    pub last_error: Option<LastError>,
    pub title: String,
    pub description: String,
    pub plan: String,
    pub scenario_count: u32,
    pub files: Vec<GeneratedFile>,
    pub commit_hash: Option<String>,
}

impl RunView {
    /// First generated file, the one a commit persists.
    pub fn primary_file(&self) -> Option<&GeneratedFile> {
        self.files.first()
    }
}
