//! Error types for the testpilot library.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::Stage;

/// Comprehensive error type for all testpilot operations.
#[derive(Error, Debug)]
pub enum PilotError {
    /// A forward transition was attempted without satisfying its gate
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// The requested action is not allowed in the current stage
    #[error("Cannot {action} while the run is in the {stage} stage")]
    InvalidTransition { stage: Stage, action: String },
    /// Another generation or commit call is still outstanding for the run
    #[error("Another operation is already in progress for this run")]
    Busy,
    /// The generation backend failed or broke its response contract
    #[error("Generation failed: {message}")]
    Generation { message: String },
    /// The outstanding call was cancelled before its response was applied
    #[error("Operation was cancelled")]
    Cancelled,
    /// Project not found for the given ID
    #[error("Project with ID {id} not found")]
    ProjectNotFound { id: String },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Coarse classification of errors surfaced to the workflow host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Gate failures, disallowed transitions, busy runs
    Validation,
    /// Backend failures, timeouts, cancellations
    Generation,
    /// Store resolution or write failures
    Persistence,
    /// Environment or wiring problems
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Generation => "generation",
            ErrorKind::Persistence => "persistence",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PilotError {
        PilotError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PilotError {
        PilotError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PilotError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Creates a generation error from any displayable message.
    pub fn generation(message: impl fmt::Display) -> Self {
        PilotError::Generation {
            message: message.to_string(),
        }
    }

    /// Creates an invalid transition error for the given stage and action.
    pub fn invalid_transition(stage: Stage, action: impl Into<String>) -> Self {
        PilotError::InvalidTransition {
            stage,
            action: action.into(),
        }
    }

    /// Classifies the error for the workflow host.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PilotError::Validation { .. } | PilotError::InvalidTransition { .. } | PilotError::Busy => {
                ErrorKind::Validation
            }
            PilotError::Generation { .. } | PilotError::Cancelled => ErrorKind::Generation,
            PilotError::ProjectNotFound { .. }
            | PilotError::Database { .. }
            | PilotError::FileSystem { .. }
            | PilotError::Serialization { .. } => ErrorKind::Persistence,
            PilotError::XdgDirectory(_) | PilotError::Configuration { .. } => ErrorKind::Internal,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PilotError::database(message).with_source(e))
    }
}

/// Result type alias for testpilot operations
pub type Result<T> = std::result::Result<T, PilotError>;
