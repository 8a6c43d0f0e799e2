use std::sync::Arc;

use anyhow::Context;
use aurafit_client::http_client::GeminiCoachClient;
use aurafit_mcp::{AuraFitMcpHandler, ProfileConfig, config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_env = logging::log_level_from(|k| std::env::var(k).ok());
    logging::init(&log_env);
    tracing::info!("aurafit_mcp: log filter: {}", log_env);

    let config = match config::load_coach_config() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("aurafit_mcp: {}", e);
            return Err(e).context("GEMINI_API_KEY (or API_KEY) must be set");
        }
    };
    let client = GeminiCoachClient::from_config(&config).context("failed to build coach client")?;
    let profile = ProfileConfig::from_env();
    tracing::info!(
        analysis_model = %config.analysis_model,
        summary_model = %config.summary_model,
        goal = %profile.goal,
        "aurafit_mcp: configured"
    );

    let handler = AuraFitMcpHandler::new(Arc::new(client), &profile);
    tracing::info!(
        "aurafit_mcp: registered {} tools and {} prompts",
        handler.tool_count(),
        handler.prompt_count()
    );

    tracing::info!("aurafit_mcp: starting stdio MCP server...");
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let server = rmcp::serve_server(handler, transport).await?;

    tracing::info!("aurafit_mcp: service initialized as server");
    server.waiting().await?;

    Ok(())
}
