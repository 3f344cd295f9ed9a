//! Command-line interface definitions and their handlers
//!
//! Argument structs carry the clap derives and convert into the
//! interface-agnostic parameter types of `testpilot_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Handlers / Pipeline
//! ```
//!
//! [`Cli`] executes the parsed commands and renders every result as
//! markdown through the [`TerminalRenderer`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use log::{debug, info};
use testpilot_core::{
    export_json,
    generation::GeneratedFile,
    handle_create_project, handle_delete_project, handle_list_projects, handle_list_test_cases,
    handle_show_project, handle_show_test_case, import_json,
    models::{Browser, ProjectType, ScreenshotPolicy, TestLanguage, VideoPolicy},
    params::{CreateProject, DeleteProject, Id, ShowTestCase},
    ArtifactStore, CreateResult, DeleteResult, ImportResult, OperationStatus, PipelineBuilder,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// CLI Argument Wrappers
// ============================================================================

/// Arguments for creating a project.
///
/// Omitted settings take the same defaults as [`CreateProject::default`].
#[derive(Args)]
pub struct CreateProjectArgs {
    /// Project name
    pub name: String,

    /// Application URL the generated suites navigate to
    #[arg(long)]
    pub base_url: String,

    /// Optional description of the project
    #[arg(short, long)]
    pub description: Option<String>,

    /// Whether the project targets a new or an existing repository
    #[arg(long = "type", value_name = "new|existing")]
    pub project_type: Option<ProjectType>,

    /// Repository URL (required for existing projects)
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Branch commits land on
    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long)]
    pub git_username: Option<String>,

    #[arg(long)]
    pub git_email: Option<String>,

    /// Access token used to push commits
    #[arg(long, env = "TP_GIT_TOKEN", hide_env_values = true)]
    pub git_token: Option<String>,

    /// Folder inside the repository holding the spec files
    #[arg(long)]
    pub test_folder: Option<String>,

    /// Language of the generated suites
    #[arg(long, value_name = "typescript|javascript")]
    pub language: Option<TestLanguage>,

    #[arg(long, value_name = "chromium|firefox|webkit")]
    pub browser: Option<Browser>,

    /// Per-test timeout in seconds
    #[arg(long)]
    pub timeout: Option<u32>,

    #[arg(long)]
    pub retries: Option<u32>,

    #[arg(long, value_name = "off|on|only-on-failure")]
    pub screenshots: Option<ScreenshotPolicy>,

    /// Run browsers without a window
    #[arg(long, value_name = "true|false")]
    pub headless: Option<bool>,

    #[arg(long, value_name = "off|on|retain-on-failure|on-first-retry")]
    pub video: Option<VideoPolicy>,
}

impl From<CreateProjectArgs> for CreateProject {
    fn from(args: CreateProjectArgs) -> Self {
        let defaults = CreateProject::default();
        CreateProject {
            name: args.name,
            description: args.description.unwrap_or(defaults.description),
            project_type: args.project_type.unwrap_or(defaults.project_type),
            repo_url: args.repo_url.unwrap_or(defaults.repo_url),
            branch: args.branch.unwrap_or(defaults.branch),
            git_username: args.git_username.unwrap_or(defaults.git_username),
            git_email: args.git_email.unwrap_or(defaults.git_email),
            git_token: args.git_token.unwrap_or(defaults.git_token),
            test_folder: args.test_folder.unwrap_or(defaults.test_folder),
            base_url: args.base_url,
            test_language: args.language.unwrap_or(defaults.test_language),
            default_browser: args.browser.unwrap_or(defaults.default_browser),
            timeout: args.timeout.unwrap_or(defaults.timeout),
            retries: args.retries.unwrap_or(defaults.retries),
            screenshots: args.screenshots.unwrap_or(defaults.screenshots),
            headless: args.headless.unwrap_or(defaults.headless),
            video_recording: args.video.unwrap_or(defaults.video_recording),
        }
    }
}

/// Arguments for commands that target a project by ID.
#[derive(Args)]
pub struct ProjectIdArgs {
    /// Project ID
    pub id: String,
}

impl From<ProjectIdArgs> for Id {
    fn from(args: ProjectIdArgs) -> Self {
        Id { id: args.id }
    }
}

/// Arguments for deleting a project.
#[derive(Args)]
pub struct DeleteProjectArgs {
    /// Project ID
    pub id: String,

    /// Confirm that the project and all of its test cases are removed
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeleteProjectArgs> for DeleteProject {
    fn from(args: DeleteProjectArgs) -> Self {
        DeleteProject {
            id: args.id,
            confirmed: args.confirm,
        }
    }
}

/// Arguments for importing projects from an export file.
#[derive(Args)]
pub struct ImportArgs {
    /// JSON file produced by `tp project export`
    pub file: PathBuf,
}

/// Arguments for showing one committed test case.
#[derive(Args)]
pub struct ShowTestArgs {
    pub project_id: String,
    pub test_id: String,
}

impl From<ShowTestArgs> for ShowTestCase {
    fn from(args: ShowTestArgs) -> Self {
        ShowTestCase {
            project_id: args.project_id,
            test_id: args.test_id,
        }
    }
}

/// Arguments for running a story through the pipeline.
#[derive(Args)]
pub struct GenerateArgs {
    /// Project the suite is committed to
    pub project_id: String,

    /// Test title, e.g. "Checkout Flow"; also names the spec file
    #[arg(long)]
    pub title: String,

    /// User story with optional acceptance criteria
    #[arg(long, conflicts_with = "story_file", required_unless_present = "story_file")]
    pub story: Option<String>,

    /// Read the user story from a file
    #[arg(long)]
    pub story_file: Option<PathBuf>,

    /// Replace the synthesized plan with the contents of this file
    #[arg(long)]
    pub plan_file: Option<PathBuf>,

    /// Stop after code generation without committing
    #[arg(long)]
    pub no_commit: bool,

    /// Write the generated files into this directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    #[command(alias = "c")]
    Create(CreateProjectArgs),
    /// List all projects
    #[command(alias = "ls")]
    List,
    /// Show a project with its test cases
    #[command(alias = "s")]
    Show(ProjectIdArgs),
    /// Delete a project and all of its test cases
    #[command(alias = "rm")]
    Delete(DeleteProjectArgs),
    /// Print every project as JSON
    Export,
    /// Load projects from a JSON export
    Import(ImportArgs),
}

#[derive(Subcommand)]
pub enum TestCommands {
    /// List the test cases committed to a project
    #[command(alias = "ls")]
    List(ProjectIdArgs),
    /// Show one test case with its code
    #[command(alias = "s")]
    Show(ShowTestArgs),
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Executes parsed commands against the store and pipeline.
pub struct Cli {
    pipelines: PipelineBuilder,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(pipelines: PipelineBuilder, renderer: TerminalRenderer) -> Self {
        Self {
            pipelines,
            renderer,
        }
    }

    pub async fn handle_project_command(&self, command: ProjectCommands) -> Result<()> {
        match command {
            ProjectCommands::Create(args) => self.create_project(args.into()).await,
            ProjectCommands::List => self.list_projects().await,
            ProjectCommands::Show(args) => self.show_project(args.into()).await,
            ProjectCommands::Delete(args) => self.delete_project(args.into()).await,
            ProjectCommands::Export => self.export_projects().await,
            ProjectCommands::Import(args) => self.import_projects(&args.file).await,
        }
    }

    pub async fn handle_test_command(&self, command: TestCommands) -> Result<()> {
        match command {
            TestCommands::List(args) => self.list_test_cases(args.into()).await,
            TestCommands::Show(args) => self.show_test_case(args.into()).await,
        }
    }

    async fn create_project(&self, params: CreateProject) -> Result<()> {
        let project = handle_create_project(self.store(), &params)
            .await
            .context("Failed to create project")?;
        self.renderer
            .render(&CreateResult::new(project).to_string())
    }

    pub async fn list_projects(&self) -> Result<()> {
        let projects = handle_list_projects(self.store())
            .await
            .context("Failed to list projects")?;
        self.renderer.render(&projects.to_string())
    }

    async fn show_project(&self, params: Id) -> Result<()> {
        let Some(project) = handle_show_project(self.store(), &params)
            .await
            .context("Failed to load project")?
        else {
            bail!("Project with ID {} not found", params.id);
        };
        self.renderer.render(&project.to_string())
    }

    async fn delete_project(&self, params: DeleteProject) -> Result<()> {
        match handle_delete_project(self.store(), &params).await? {
            Some(project) => self
                .renderer
                .render(&DeleteResult::new(project).to_string()),
            None => bail!("Project with ID {} not found", params.id),
        }
    }

    async fn export_projects(&self) -> Result<()> {
        let json = export_json(self.store())
            .await
            .context("Failed to export projects")?;
        println!("{json}");
        Ok(())
    }

    async fn import_projects(&self, file: &Path) -> Result<()> {
        let json = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let imported = import_json(self.store(), &json)
            .await
            .context("Failed to import projects")?;
        self.renderer
            .render(&ImportResult { imported }.to_string())
    }

    async fn list_test_cases(&self, params: Id) -> Result<()> {
        let Some(test_cases) = handle_list_test_cases(self.store(), &params)
            .await
            .context("Failed to list test cases")?
        else {
            bail!("Project with ID {} not found", params.id);
        };
        self.renderer.render(&test_cases.to_string())
    }

    async fn show_test_case(&self, params: ShowTestCase) -> Result<()> {
        let Some(test_case) = handle_show_test_case(self.store(), &params).await? else {
            bail!(
                "Test case {} not found in project {}",
                params.test_id,
                params.project_id
            );
        };
        self.renderer.render(&test_case.to_string())
    }

    /// Runs one story through every stage of a fresh pipeline.
    pub async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let story = match (&args.story, &args.story_file) {
            (Some(story), _) => story.clone(),
            (None, Some(path)) => read_text(path)?,
            (None, None) => bail!("Either --story or --story-file is required"),
        };

        let run = self.pipelines.build(&args.project_id).await?;
        run.set_story(&args.title, &story)?;

        info!("generating plan for '{}'", args.title);
        run.advance().await.context("Plan generation failed")?;
        if let Some(path) = &args.plan_file {
            let view = run.edit_plan(&read_text(path)?)?;
            debug!("plan replaced from {} ({} scenarios)", path.display(), view.scenario_count);
        }

        info!("generating code for '{}'", args.title);
        let view = run.advance().await.context("Code generation failed")?;
        self.renderer.render(&view.to_string())?;

        if let Some(dir) = &args.output_dir {
            let written = write_files(dir, &view.files)?;
            self.renderer.render(
                &OperationStatus::success(format!(
                    "Wrote {written} file(s) to {}",
                    dir.display()
                ))
                .to_string(),
            )?;
        }

        if args.no_commit {
            return Ok(());
        }

        let test_case = run.commit().await.context("Commit failed")?;
        self.renderer
            .render(&format!("\n{}", CreateResult::new(test_case)))
    }

    fn store(&self) -> &dyn ArtifactStore {
        self.pipelines.store().as_ref()
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes generated files under `dir`, creating it if needed.
fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for file in files {
        // Generated names are flat; refuse anything that would escape `dir`.
        let name = Path::new(&file.filename);
        if name.components().count() != 1 || name.file_name().is_none() {
            bail!("Refusing to write generated file '{}'", file.filename);
        }
        let path = dir.join(name);
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(files.len())
}
