//! HTTP surface for the review service.
//!
//! Two routes: an index page confirming the service is up, and the
//! webhook endpoint that acknowledges events immediately and hands the
//! actual review work to detached tasks.

use std::{error::Error, sync::Arc};

mod core;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::routes::{index_route::index, webhook::webhook_route::handle_webhook};

pub async fn start() -> Result<(), Box<dyn Error>> {
    let state = Arc::new(AppState::from_env()?);
    let listen_addr = state.listen_addr.clone();

    let app = Router::new()
        .route("/", get(index))
        .route("/webhook", post(handle_webhook))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(addr = %listen_addr, "review service listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
