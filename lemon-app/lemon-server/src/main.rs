use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use lemon_api::{build_router, AppState};
use lemon_core::repositories::Repositories;
use lemon_infrastructure::{create_pool, memory_repositories, postgres_repositories, run_migrations};
use lemon_security::JwtService;
use lemon_shared::config::{AppConfig, DatabaseSettings, StorageBackend};
use lemon_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_telemetry(&config.log)?;

    info!("{} starting ({} environment)", config.app.name, config.app.env);

    let repos = open_store(&config.database).await?;

    let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry));
    let state = AppState::new(&repos, jwt);

    if let Some(admin) = &config.admin {
        let user = state
            .services
            .auth
            .ensure_superuser(&admin.username, &admin.password, &admin.email)
            .await
            .context("failed to bootstrap admin user")?;
        info!("Admin account '{}' ready", user.username);
    } else if config.is_production() {
        warn!("No admin account configured");
    }

    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn open_store(settings: &DatabaseSettings) -> anyhow::Result<Repositories> {
    match settings.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(settings)
                .await
                .context("failed to connect to database")?;
            if settings.run_migrations {
                run_migrations(&pool).await.context("failed to run migrations")?;
                info!("Migrations applied");
            }
            Ok(postgres_repositories(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory store; data is lost on shutdown");
            Ok(memory_repositories())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
