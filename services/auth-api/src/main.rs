//! Gatekeep Auth API server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use auth_api::config::Config;
use auth_api::purge::spawn_registry_purge;
use auth_api::state::AppState;
use gatekeep_auth_core::SystemClock;
use gatekeep_db::Repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("auth_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gatekeep Auth API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        auth = ?config.auth,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create storage and application state
    let clock = Arc::new(SystemClock);
    let state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = gatekeep_db::create_pool(&database_url).await?;
            tracing::info!("Database pool created");
            gatekeep_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");
            AppState::with_postgres(config.clone(), Repositories::new(pool), clock)?
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; users and refresh tokens are kept in memory and lost on restart"
            );
            AppState::in_memory(config.clone(), clock)?
        }
    };

    // Background registry cleanup
    let purge = spawn_registry_purge(state.tokens.clone(), config.purge_interval);

    // Build HTTP router
    let app = auth_api::build_router(state, metrics_handle);

    // Start server
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    if let Err(e) = run_http_server(app, http_addr).await {
        tracing::error!(error = ?e, "HTTP server error");
    }

    purge.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let service: IntoMakeServiceWithConnectInfo<Router, SocketAddr> =
        app.into_make_service_with_connect_info();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "auth_logins_total",
        "Total login attempts by outcome"
    );
    metrics::describe_counter!(
        "auth_registrations_total",
        "Total registration attempts by outcome"
    );
    metrics::describe_counter!("auth_logouts_total", "Total logout requests");
    metrics::describe_counter!(
        "auth_token_refreshes_total",
        "Total refresh token rotations by outcome"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
