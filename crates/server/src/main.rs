use anyhow::Context as _;
use apidocs_mcp_server::ApiDocsServer;
use apidocs_mcp_server::cli::{Cli, init_tracing};
use clap::Parser as _;
use rmcp::ServiceExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    let config = cli.api_config()?;
    tracing::info!(
        "Starting apidocs-mcp ({} environment, base URL {}, read-only: {}, API key: {})",
        config.environment,
        config.base_url,
        config.read_only,
        if config.has_api_key() { "set" } else { "not set" }
    );

    let server = ApiDocsServer::from_config(&config).context("failed to build server")?;
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("MCP initialization failed")?;
    let reason = service.waiting().await?;
    tracing::info!("MCP session ended: {:?}", reason);
    Ok(())
}
