//! Serve command: MCP server over stdio.

use anyhow::Context;
use clap::Args;
use docqa_core::Config;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use crate::server::DocqaServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the MCP server until the client disconnects.
///
/// Stdout carries the protocol, so all logging stays on stderr.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    info!(max_input = ?max_input, "starting MCP server on stdio");

    let service = DocqaServer::with_config(config.settings, max_input)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
