//! HTTP server lifecycle: bind, serve, shut down on ctrl-c.

use crate::api::router::app_router;
use crate::api::types::ApiContext;

/// Bind the configured address and serve until interrupted.
pub async fn serve(ctx: ApiContext) -> Result<(), String> {
    let addr = ctx.config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    let local = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;
    tracing::info!(addr = %local, "API server listening");

    let app = app_router(ctx);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
