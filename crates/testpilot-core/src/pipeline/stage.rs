//! Pipeline stages and the allowed transitions between them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Stage of a generation run.
///
/// Runs move forward one stage at a time, step back one stage, or reset to
/// [`Stage::Story`]. Nothing skips a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    /// Collecting the feature title and description
    #[default]
    Story,
    /// Reviewing and editing the synthesized plan
    Plan,
    /// Reviewing the synthesized spec files
    Code,
    /// The spec was committed to the project
    Done,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 4] = [Stage::Story, Stage::Plan, Stage::Code, Stage::Done];

    /// Stage reached by advancing, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Story => Some(Stage::Plan),
            Stage::Plan => Some(Stage::Code),
            Stage::Code => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    /// Stage reached by going back, if any.
    ///
    /// A committed run cannot be un-committed, so `Done` has no previous
    /// stage.
    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::Plan => Some(Stage::Story),
            Stage::Code => Some(Stage::Plan),
            Stage::Story | Stage::Done => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Story => "STORY",
            Stage::Plan => "PLAN",
            Stage::Code => "CODE",
            Stage::Done => "DONE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STORY" => Ok(Stage::Story),
            "PLAN" => Ok(Stage::Plan),
            "CODE" => Ok(Stage::Code),
            "DONE" => Ok(Stage::Done),
            _ => Err(format!("Invalid stage: {s}")),
        }
    }
}
