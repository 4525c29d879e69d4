//! Asset Warden API server binary.

use anyhow::{Context, Result};
use tracing::info;

use aw_api::logging::LoggingConfig;
use aw_api::{ApiServer, ApiServerConfig, AppState};
use aw_core::db::{
    create_audit_repository, create_pool, create_user_repository, ensure_admin_user,
    run_migrations,
};

#[tokio::main]
async fn main() -> Result<()> {
    LoggingConfig::from_env().init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://asset-warden.db?mode=rwc".to_string());

    info!(database_url = %database_url, "Connecting to database");
    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let users = create_user_repository(&pool);
    let audit = create_audit_repository(&pool);
    if let Some(admin) = ensure_admin_user(users.as_ref(), audit.as_ref())
        .await
        .context("Failed to seed admin user")?
    {
        info!(admin_id = %admin.id, email = %admin.email, "Seeded initial admin user");
    }

    let state = AppState::from_pool(pool);
    let config = ApiServerConfig::from_env();

    info!(address = %config.bind_address, "Asset Warden API listening");
    let server = ApiServer::new(state, config);
    server.run().await.context("Server error")?;

    Ok(())
}
