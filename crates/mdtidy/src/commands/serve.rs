//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, instrument};

use mdtidy_core::config::Config;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve the analyzer and formatter over MCP until the client disconnects.
///
/// Logs go to stderr (and the optional log file); stdout carries the protocol.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    // Fail fast on an invalid config.
    config
        .analysis_config()
        .context("invalid analysis configuration")?;
    config
        .format_config()
        .context("invalid format configuration")?;

    info!(max_input_bytes = ?max_input_bytes, "starting MCP server on stdio");
    let service = ProjectServer::new(config, max_input_bytes)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server failed")?;
    info!("MCP server stopped");
    Ok(())
}
