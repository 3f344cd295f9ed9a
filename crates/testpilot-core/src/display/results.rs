//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{Project, TestCase};

/// Outcome of a create operation, followed by the created resource.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Project> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created project with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<TestCase> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Committed {} as {}",
            self.resource.filename, self.resource.commit_hash
        )?;
        writeln!(f)?;
        self.resource.fmt_entry(f)
    }
}

/// Confirmation of a delete operation.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Project> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted project '{}' (ID: {}) with {} test cases",
            self.resource.name,
            self.resource.id,
            self.resource.test_cases.len()
        )
    }
}

/// Number of projects written by an import.
pub struct ImportResult {
    pub imported: usize,
}

impl fmt::Display for ImportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.imported {
            1 => writeln!(f, "Imported 1 project"),
            n => writeln!(f, "Imported {n} projects"),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::params::CreateProject;

    #[test]
    fn test_create_and_delete_messages() {
        let project = CreateProject {
            name: "Shop".to_string(),
            base_url: "https://shop.example.com".to_string(),
            ..Default::default()
        }
        .into_project("p-9".to_string(), Timestamp::now());

        let created = CreateResult::new(project.clone()).to_string();
        assert!(created.starts_with("Created project with ID: p-9\n\n# Shop"));

        let deleted = DeleteResult::new(project).to_string();
        assert_eq!(deleted, "Deleted project 'Shop' (ID: p-9) with 0 test cases\n");

        assert_eq!(ImportResult { imported: 1 }.to_string(), "Imported 1 project\n");
        assert_eq!(ImportResult { imported: 3 }.to_string(), "Imported 3 projects\n");
    }
}
