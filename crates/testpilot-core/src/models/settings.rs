//! Enumerations for project execution settings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether the project starts from scratch or targets an existing repository.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    New,
    Existing,
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(ProjectType::New),
            "existing" => Ok(ProjectType::Existing),
            _ => Err(format!("Invalid project type: {s}")),
        }
    }
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::New => "new",
            ProjectType::Existing => "existing",
        }
    }
}

/// Language the generated test suites are written in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TestLanguage {
    #[default]
    TypeScript,
    JavaScript,
}

impl FromStr for TestLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Ok(TestLanguage::TypeScript),
            "javascript" | "js" => Ok(TestLanguage::JavaScript),
            _ => Err(format!("Invalid test language: {s}")),
        }
    }
}

impl TestLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestLanguage::TypeScript => "typescript",
            TestLanguage::JavaScript => "javascript",
        }
    }

    /// File extension used for generated spec files.
    pub fn extension(&self) -> &'static str {
        match self {
            TestLanguage::TypeScript => "ts",
            TestLanguage::JavaScript => "js",
        }
    }
}

/// Browser engine the suites run against by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            _ => Err(format!("Invalid browser: {s}")),
        }
    }
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// When screenshots are captured during a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ScreenshotPolicy {
    Off,
    On,
    #[default]
    OnlyOnFailure,
}

impl FromStr for ScreenshotPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(ScreenshotPolicy::Off),
            "on" => Ok(ScreenshotPolicy::On),
            "only-on-failure" => Ok(ScreenshotPolicy::OnlyOnFailure),
            _ => Err(format!("Invalid screenshot policy: {s}")),
        }
    }
}

impl ScreenshotPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenshotPolicy::Off => "off",
            ScreenshotPolicy::On => "on",
            ScreenshotPolicy::OnlyOnFailure => "only-on-failure",
        }
    }
}

/// When videos are recorded during a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum VideoPolicy {
    #[default]
    Off,
    On,
    RetainOnFailure,
    OnFirstRetry,
}

impl FromStr for VideoPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(VideoPolicy::Off),
            "on" => Ok(VideoPolicy::On),
            "retain-on-failure" => Ok(VideoPolicy::RetainOnFailure),
            "on-first-retry" => Ok(VideoPolicy::OnFirstRetry),
            _ => Err(format!("Invalid video policy: {s}")),
        }
    }
}

impl VideoPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoPolicy::Off => "off",
            VideoPolicy::On => "on",
            VideoPolicy::RetainOnFailure => "retain-on-failure",
            VideoPolicy::OnFirstRetry => "on-first-retry",
        }
    }
}
