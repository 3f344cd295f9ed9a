//! Display implementations for pipeline run snapshots.

use std::fmt;

use crate::pipeline::{LastError, RunView, Stage};

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl RunView {
    fn status(&self) -> &'static str {
        if self.busy {
            "working"
        } else if self.stage == Stage::Done {
            "committed"
        } else if self.can_advance {
            "ready to advance"
        } else {
            "waiting for input"
        }
    }
}

impl fmt::Display for RunView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Run for project {}", self.project_id)?;
        writeln!(f)?;
        writeln!(f, "- Stage: {}", self.stage)?;
        writeln!(f, "- Status: {}", self.status())?;
        if !self.title.is_empty() {
            writeln!(f, "- Title: {}", self.title)?;
        }
        if !self.plan.is_empty() {
            writeln!(f, "- Scenarios: {}", self.scenario_count)?;
        }
        if let Some(hash) = &self.commit_hash {
            writeln!(f, "- Commit: {hash}")?;
        }
        if let Some(error) = &self.last_error {
            writeln!(f, "- Last error: {error}")?;
        }

        if !self.description.is_empty() {
            writeln!(f, "\n## Story\n")?;
            writeln!(f, "{}", self.description.trim_end())?;
        }

        if !self.plan.is_empty() {
            writeln!(f, "\n## Plan\n")?;
            writeln!(f, "{}", self.plan.trim_end())?;
        }

        if !self.files.is_empty() {
            writeln!(f, "\n## Files")?;
            for file in &self.files {
                let fence = if file.filename.ends_with(".ts") {
                    "typescript"
                } else {
                    "javascript"
                };
                writeln!(f, "\n### {}\n", file.filename)?;
                writeln!(f, "```{fence}")?;
                writeln!(f, "{}", file.content.trim_end())?;
                writeln!(f, "```")?;
            }
        }

        Ok(())
    }
}
