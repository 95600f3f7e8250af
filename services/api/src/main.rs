use anyhow::Result;
use std::sync::Arc;
use tracing::info;

mod error;
mod middleware;
mod models;
mod resolver;
mod routes;
mod state;

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    settings::ServerConfig,
    store::PostgresStore,
    token::{TokenConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    common::telemetry::init();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let store = PostgresStore::new(pool);
    store.ensure_collections().await?;

    let token_config = TokenConfig::from_env()?;
    let app_state = AppState::new(Arc::new(store), TokenService::new(&token_config));

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("API", 3000)?;
    let listener = TcpListener::bind(server_config.address()).await?;
    info!("API service listening on {}", server_config.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
