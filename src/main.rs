//! irdash - Incident Response Dashboard core
//!
//! Fetches security events (intrusion findings, audit logs, flow logs) from an
//! HTTP backend, aggregates them, and serves the resulting view state to a
//! browser front-end.

mod aggregate;
mod config;
mod fetch;
mod records;
mod view;
mod web;

use config::DashboardConfig;
use fetch::{ApiClient, Dashboard};
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("irdash=info".parse()?))
        .init();

    // Load configuration
    let cfg = DashboardConfig::load();
    tracing::info!("Starting irdash on port {}...", cfg.http_port);
    tracing::info!("Using event backend at {}", cfg.api_base_url);
    if cfg.guard_stale_responses {
        tracing::info!("Stale response guard enabled");
    }

    let client = ApiClient::new(&cfg.api_base_url)?;
    let dashboard = Arc::new(Dashboard::new(client, &cfg));

    // Initial load of the default tab
    let initial = dashboard.clone();
    tokio::spawn(async move {
        if let Err(e) = initial.refresh().await {
            tracing::warn!("Initial load failed: {}", e);
        }
    });

    // Start web server
    let server = Server::new(cfg, dashboard);
    server.start().await?;

    Ok(())
}
