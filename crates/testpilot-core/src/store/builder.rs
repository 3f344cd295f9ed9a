//! Builder for creating and configuring the SQLite artifact store.

use std::path::{Path, PathBuf};

use super::SqliteStore;
use crate::error::{PilotError, Result};

/// Builder for [`SqliteStore`] instances.
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/testpilot/testpilot.db` or
    /// `~/.local/share/testpilot/testpilot.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating the database if needed.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::XdgDirectory` if no default path can be resolved,
    /// `PilotError::FileSystem` or `PilotError::Database` if the database
    /// cannot be initialized.
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };
        log::debug!("Opening artifact store at {}", db_path.display());
        SqliteStore::open(db_path).await
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("testpilot")
            .place_data_file("testpilot.db")
            .map_err(|e| PilotError::XdgDirectory(e.to_string()))
    }
}
