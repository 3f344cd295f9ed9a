//! MCP server implementation for testpilot
//!
//! Exposes projects and the per-project generation run to AI assistants
//! over the Model Context Protocol on stdio.


use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
        ListPromptsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities,
        ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use testpilot_core::PipelineBuilder;
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;
pub mod prompts;

pub use handlers::{CreateProject, EditPlan, Id, McpHandlers, RunTarget, SetStory, ToolOutput};

type McpResult = Result<CallToolResult, McpError>;

fn into_result(output: ToolOutput) -> McpResult {
    output.map(|text| CallToolResult::success(vec![Content::text(text)]))
}

/// MCP server for testpilot
#[derive(Clone)]
pub struct TestpilotMcpServer {
    handlers: McpHandlers,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TestpilotMcpServer {
    pub fn new(pipelines: PipelineBuilder) -> Self {
        Self {
            handlers: McpHandlers::new(pipelines),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "create_project",
        description = "Create a project describing an application under test. Requires name and base_url (the URL generated tests navigate to). Optional settings: description, project_type ('new' or 'existing'; existing requires repo_url), branch, git_username, git_email, git_token, test_folder, test_language ('typescript' or 'javascript'), default_browser, timeout, retries, screenshots, headless, video_recording. Returns the new project ID."
    )]
    async fn create_project(&self, Parameters(params): Parameters<CreateProject>) -> McpResult {
        into_result(self.handlers.create_project(params.as_ref()).await)
    }

    #[tool(
        name = "list_projects",
        description = "List all projects with their IDs and how many committed test cases each has."
    )]
    async fn list_projects(&self) -> McpResult {
        into_result(self.handlers.list_projects().await)
    }

    #[tool(
        name = "show_project",
        description = "Show a project's settings and every test case committed to it, by project ID."
    )]
    async fn show_project(&self, Parameters(params): Parameters<Id>) -> McpResult {
        into_result(self.handlers.show_project(params.as_ref()).await)
    }

    #[tool(
        name = "set_story",
        description = "Set the test title and user story of a project's run. Only allowed in the STORY stage. The title names the generated spec file (\"Checkout Flow\" becomes checkout-flow.spec.ts); include acceptance criteria in the description as a bulleted list to get one scenario per criterion."
    )]
    async fn set_story(&self, Parameters(params): Parameters<SetStory>) -> McpResult {
        into_result(self.handlers.set_story(params.as_ref()).await)
    }

    #[tool(
        name = "advance",
        description = "Advance a project's run one stage: STORY synthesizes a test plan, PLAN generates spec files, CODE commits the primary file. Fails without changing the stage if the current stage's input is incomplete or the generation backend fails. Returns the run snapshot."
    )]
    async fn advance(&self, Parameters(params): Parameters<RunTarget>) -> McpResult {
        into_result(self.handlers.advance(params.as_ref()).await)
    }

    #[tool(
        name = "go_back",
        description = "Step a project's run back one stage. Going back from PLAN discards the plan; going back from CODE discards the generated files but keeps the plan."
    )]
    async fn go_back(&self, Parameters(params): Parameters<RunTarget>) -> McpResult {
        into_result(self.handlers.go_back(params.as_ref()).await)
    }

    #[tool(
        name = "edit_plan",
        description = "Replace the markdown test plan of a run in the PLAN stage. Keep scenarios as numbered items (\"1. **TC001: Name**\") so they are counted."
    )]
    async fn edit_plan(&self, Parameters(params): Parameters<EditPlan>) -> McpResult {
        into_result(self.handlers.edit_plan(params.as_ref()).await)
    }

    #[tool(
        name = "commit",
        description = "Commit the primary generated spec file of a run in the CODE stage as a new test case of the project. Returns the commit hash. The run moves to DONE."
    )]
    async fn commit(&self, Parameters(params): Parameters<RunTarget>) -> McpResult {
        into_result(self.handlers.commit(params.as_ref()).await)
    }

    #[tool(
        name = "reset",
        description = "Clear a project's run back to an empty STORY stage. Abandons any outstanding generation; its late result is discarded."
    )]
    async fn reset(&self, Parameters(params): Parameters<RunTarget>) -> McpResult {
        into_result(self.handlers.reset(params.as_ref()).await)
    }

    #[tool(
        name = "cancel",
        description = "Cancel the outstanding generation or commit call of a project's run. The run keeps its stage and content. A commit whose test case is already being stored cannot be cancelled."
    )]
    async fn cancel(&self, Parameters(params): Parameters<RunTarget>) -> McpResult {
        into_result(self.handlers.cancel(params.as_ref()).await)
    }

    #[tool(
        name = "run_status",
        description = "Show a project's run: stage, whether it can advance, whether a call is outstanding, the last error, and the current story, plan and generated files."
    )]
    async fn run_status(&self, Parameters(params): Parameters<RunTarget>) -> McpResult {
        into_result(self.handlers.run_status(params.as_ref()).await)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TestpilotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "testpilot".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(r#"testpilot turns user stories into Playwright test suites committed to a project.

## Core Concepts
- **Projects**: An application under test with its base URL, repository and execution settings
- **Runs**: One generation run per project, moving through STORY → PLAN → CODE → DONE
- **Test cases**: Committed spec files stored with their project

## Workflow
1. `create_project` (or `list_projects` to find an existing one)
2. `set_story` with a title and user story
3. `advance` to synthesize the plan; `edit_plan` to refine it
4. `advance` to generate code; `go_back` to revise the plan
5. `commit` to store the primary spec file as a test case

Use `run_status` to inspect a run, `cancel` to abandon a slow call and `reset` to start over."#.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(prompts::list_prompts())
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::get_prompt(&request)
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: TestpilotMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting testpilot MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
