// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use scrape_agent::app::{create_router, AppState, VERSION};
use scrape_agent::models::config::ServiceConfig;
use scrape_agent::services::logging::init_logging;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::parse();
    init_logging(&config.log_filter)?;

    let listen_addr = config.listen_addr();
    info!(
        text_mode = %config.text_mode,
        max_attempts = config.max_attempts,
        max_batch_urls = config.max_batch_urls,
        "Starting scrape-agent"
    );

    let state = AppState::new(config).context("Failed to build HTTP client")?;
    let app = create_router(state);

    // Bind to 0.0.0.0 by default to accept connections from any interface (required for Docker)
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;
    let addr = listener.local_addr()?;

    info!("scrape-agent v{} listening on {}", VERSION, addr);
    info!("Health check: http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Resolve on Ctrl-C. In-flight requests are allowed to finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
