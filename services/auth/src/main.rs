use anyhow::Result;
use std::sync::Arc;
use tracing::info;

mod models;
mod repositories;
mod routes;

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    repository::Repository,
    settings::ServerConfig,
    store::PostgresStore,
    token::{TokenConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::repositories::UserRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub token_service: TokenService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    common::telemetry::init();

    info!("Starting authentication service");

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

    // Initialize token service
    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(&token_config);

    let user_repository = UserRepository::new(Repository::new(Arc::new(store)));

    let app_state = AppState {
        user_repository,
        token_service,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("AUTH", 3001)?;
    let listener = TcpListener::bind(server_config.address()).await?;
    info!("Authentication service listening on {}", server_config.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Authentication service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
