use std::sync::Arc;

use anyhow::Context;
use health_connect_client::config::Config;
use health_connect_client::http_client::ReqwestHealthClient;
use nueralix_mcp::NueralixMcpHandler;
use nueralix_mcp::config::InsightsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `NUERALIX_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("NUERALIX_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Append per-target overrides to keep rmcp internals quiet by default
    let combined_filter = format!("{},rmcp=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,rmcp=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("nueralix_mcp: log filter: {}", log_env);

    let bridge = Config::from_env().context("loading Health Connect bridge config")?;
    let insights = InsightsConfig::from_env().context("loading insights config")?;
    tracing::info!(
        base_url = %bridge.base_url,
        timeout_secs = bridge.timeout.as_secs(),
        "nueralix_mcp: using Health Connect bridge"
    );

    let client = ReqwestHealthClient::from_config(&bridge);
    let handler = NueralixMcpHandler::new(Arc::new(client), insights);

    tracing::info!(
        "nueralix_mcp: registered {} tools and {} prompts",
        handler.tool_count(),
        handler.prompt_count()
    );

    // Initial load, same path as a user refresh. Failures only surface as notices.
    let state = handler.insights().on_mount().await;
    tracing::info!(ready = state.capability.is_ready(), "nueralix_mcp: initial snapshot loaded");

    tracing::info!("nueralix_mcp: starting stdio MCP server...");

    use rmcp::serve_server;
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let server = serve_server(handler, transport).await?;

    tracing::info!("nueralix_mcp: service initialized as server");

    server.waiting().await?;

    Ok(())
}
