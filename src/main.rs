use anyhow::Context as _;
use tracing::info;

use workload_dashboard::api::build_app;
use workload_dashboard::config::Config;
use workload_dashboard::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let router = build_app(&config).context("failed to initialize service")?;

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!(
        "Dashboard API listening on {} (model {} at {})",
        address, config.assistant.model, config.assistant.base_url
    );

    axum::serve(listener, router).await?;

    Ok(())
}
