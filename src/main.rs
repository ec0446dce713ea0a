use std::sync::Arc;

use spark_hub::{
    app_state::AppState,
    config::{AppConfig, StoreBackend},
    database::init::{init_db, DbError},
    repositories::{PgMessageStore, PgUserDirectory},
    routes::app_routes::create_router,
};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// The main entry point for the application using the tokio runtime.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spark_hub=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let state = match build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Error initializing the database: {}", e);
            return;
        }
    };

    let app = create_router(state);

    info!("Server running on http://{}", config.bind_addr);

    // Start the server with graceful shutdown
    if let Err(e) = axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}

async fn build_state(config: &AppConfig) -> Result<AppState, DbError> {
    match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = Arc::new(init_db(database_url).await?);
            Ok(AppState::new(
                Arc::new(PgMessageStore::new(pool.clone())),
                Arc::new(PgUserDirectory::new(pool)),
                config.jwt_secret.as_str(),
            ))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory storage, data is lost on shutdown");
            Ok(AppState::in_memory(config.jwt_secret.as_str()))
        }
    }
}

// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
