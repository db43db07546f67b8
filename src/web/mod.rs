//! Web server module.
//!
//! Exposes the dashboard's view state and transitions as a small JSON API for
//! the presentation layer.

mod handlers;

use crate::config::DashboardConfig;
use crate::fetch::Dashboard;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: DashboardConfig,
    pub dashboard: Arc<Dashboard>,
}

/// Web server for the dashboard.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: DashboardConfig, dashboard: Arc<Dashboard>) -> Self {
        Self {
            state: AppState { config, dashboard },
        }
    }

    /// Build the router with all routes.
    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            .route("/api/categories", get(handlers::handle_categories))
            .route("/api/view", get(handlers::handle_view))
            .route("/api/tabs/{tab}", post(handlers::handle_select_tab))
            .route("/api/refresh", post(handlers::handle_refresh))
            .route("/api/page/next", post(handlers::handle_next_page))
            .route("/api/page/prev", post(handlers::handle_prev_page))
            .route("/api/rows/{index}", post(handlers::handle_select_row))
            .route("/api/modal", delete(handlers::handle_close_modal))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
