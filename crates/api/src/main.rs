use std::net::SocketAddr;

use anyhow::Context;

use ratedesk_api::{app, config::ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ratedesk_observability::init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let services = app::services::AppServices::from_config(&config)?;
    let router = app::build_app(services);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
