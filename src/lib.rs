pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod triage;

use tracing_subscriber::EnvFilter;

use crate::api::types::ApiContext;
use crate::config::AppConfig;

/// Initialize tracing, open (and seed) the database, and serve the API.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let app_config = AppConfig::from_env();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Some(parent) = app_config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Cannot create data directory: {e}"))?;
    }

    let conn = db::sqlite::open_database(&app_config.db_path)
        .map_err(|e| format!("Cannot open database: {e}"))?;
    db::seed::seed_if_empty(&conn).map_err(|e| format!("Seeding failed: {e}"))?;

    let ctx = ApiContext::new(app_config, conn);
    api::server::serve(ctx).await
}
