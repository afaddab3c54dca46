//! Service process
//!
//! Shared start-up path of every service binary: configuration, tracing,
//! storage, schema check, HTTP server and graceful shutdown.

use std::net::SocketAddr;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, StorageBackend};
use crate::db;
use crate::info::BuildInfo;
use crate::services::{ServiceKind, Storage};

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bank_services=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run `service` until Ctrl+C or SIGTERM
pub async fn run(service: ServiceKind) -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env(service)?;
    init_tracing(config.is_production());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(service = %service, environment = %config.environment, "Starting service");

    let storage = match config.storage {
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = db::connect(&config).await?;

            if !db::check_schema(&pool, service.required_tables()).await? {
                tracing::error!(
                    "Database schema is not complete. Apply migrations/{}/ first.",
                    service
                );
                return Err(anyhow::anyhow!("Database schema incomplete"));
            }

            tracing::info!("Database connected successfully");
            Storage::Postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on exit");
            Storage::InMemory
        }
    };

    let build_info = BuildInfo::new(service, &config.context_path, Utc::now().naive_utc());
    let app = api::build_app(service.router(&storage), &config.context_path, build_info);

    tracing::info!("Listening on http://{}{}", addr, config.context_path);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    if let Storage::Postgres(pool) = storage {
        pool.close().await;
        tracing::info!("Database connections closed");
    }
    tracing::info!("Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
