//! mcp-agent - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the agent API.

use mcp_agent::{api, config::Config, logging, version_info};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init_tracing(&config.log_level, config.log_format);

    let version = version_info();
    info!(
        version = %version.version,
        build_date = %version.build_date,
        git_commit = %version.git_commit,
        "Starting {} v{}",
        version.name,
        version.version
    );
    match &config.llm {
        Some(llm) => info!("Completion service: {} (model {})", llm.base_url, llm.model),
        None => info!("Completion service not configured"),
    }

    api::serve(config).await?;

    Ok(())
}
