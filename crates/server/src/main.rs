//! cliento-server: practice-management HTTP API.

use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cliento_server::config::Config;

#[tokio::main]
async fn main() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env();
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid BIND_ADDRESS");

    let pool = cliento_server::db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    if let Err(e) = cliento_server::db::migrate(&pool).await {
        tracing::error!(error = ?e, "Schema migration failed");
        std::process::exit(1);
    }

    tracing::info!(
        rate_limit_rps = config.rate_limit_rps,
        token_ttl_hours = config.token_ttl_hours,
        cors_origins = ?config.cors_origins,
        "Configuration loaded"
    );
    if config.password_iterations < 100_000 {
        tracing::warn!(
            iterations = config.password_iterations,
            "PASSWORD_ITERATIONS is below 100000; only use this for development"
        );
    }

    let app = cliento_server::build_app(pool, &config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "cliento listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = signal::ctrl_c() => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = signal_name, "Draining connections before shutdown");
}
