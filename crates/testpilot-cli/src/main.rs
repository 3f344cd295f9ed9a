//! testpilot CLI Application
//!
//! Command-line interface and MCP server for the testpilot test generation
//! workflow.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use args::{Args, BackendKind, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, TestpilotMcpServer};
use renderer::TerminalRenderer;
use testpilot_core::{
    GenerationClient, HttpBackend, PipelineBuilder, SimulatedCommitter, StoreBuilder,
    TemplateBackend,
};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        backend,
        backend_url,
        generation_timeout,
        latency_ms,
        command,
    } = Args::parse();

    let store = StoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize artifact store")?;

    let latency = Duration::from_millis(latency_ms);
    let client = match backend {
        BackendKind::Template => {
            GenerationClient::new(TemplateBackend::new().with_latency(latency))
        }
        BackendKind::Http => {
            let Some(url) = backend_url else {
                bail!("--backend-url (or TP_BACKEND_URL) is required with --backend http");
            };
            GenerationClient::new(HttpBackend::new(url))
        }
    };

    let pipelines = PipelineBuilder::new(Arc::new(store), client)
        .with_committer(SimulatedCommitter::new().with_latency(latency))
        .with_generation_timeout(generation_timeout.map(Duration::from_secs));

    let renderer = TerminalRenderer::new(!no_color);

    info!("testpilot started");

    match command {
        Some(Project { command }) => {
            Cli::new(pipelines, renderer)
                .handle_project_command(command)
                .await
        }
        Some(Test { command }) => {
            Cli::new(pipelines, renderer)
                .handle_test_command(command)
                .await
        }
        Some(Generate(args)) => Cli::new(pipelines, renderer).generate(args).await,
        Some(Serve) => {
            info!("Starting testpilot MCP server");
            run_stdio_server(TestpilotMcpServer::new(pipelines))
                .await
                .context("MCP server failed")
        }
        None => Cli::new(pipelines, renderer).list_projects().await,
    }
}
