use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::{GenerateArgs, ProjectCommands, TestCommands};

/// Command-line interface for the testpilot test generation workflow
///
/// testpilot keeps a catalogue of projects (applications under test) and
/// turns user stories into Playwright test suites: a story is expanded into
/// a markdown test plan, the plan into spec files, and the primary spec is
/// committed to the project. The same workflow is available to AI assistants
/// through the MCP server started by `tp serve`.
#[derive(Parser)]
#[command(version, about, name = "tp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/testpilot/testpilot.db
    #[arg(long, global = true, env = "TP_DATABASE_FILE")]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Generation backend used for plans and code
    #[arg(long, global = true, value_enum, default_value_t = BackendKind::Template, env = "TP_BACKEND")]
    pub backend: BackendKind,

    /// Endpoint of the HTTP generation service (required with --backend http)
    #[arg(long, global = true, env = "TP_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Upper bound in seconds for each generation call
    #[arg(long, global = true, env = "TP_GENERATION_TIMEOUT")]
    pub generation_timeout: Option<u64>,

    /// Simulated latency in milliseconds for template generation and commits
    #[arg(long, global = true, default_value_t = 0)]
    pub latency_ms: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which generation backend drives the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Deterministic offline templates
    Template,
    /// Remote JSON service at --backend-url
    Http,
}

/// Available commands for the testpilot CLI
///
/// - `project`: manage the projects tests are generated for
/// - `test`: browse the test cases committed to a project
/// - `generate`: run a story through the whole pipeline
/// - `serve`: start the MCP server for AI assistant integration
#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    #[command(alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Browse committed test cases
    #[command(alias = "t")]
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },
    /// Generate and commit a test suite from a user story
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Start the MCP server
    Serve,
}
