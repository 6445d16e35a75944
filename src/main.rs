//! RustPress credential server
//!
//! Serves `POST /auth/signup`, `POST /auth/signin` and `GET /users/me`.

use rustpress_credentials::{create_routes, run_migrations, AuthConfig, AuthService, ServerConfig};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter)
        .init();

    let config = AuthConfig::from_env()?;
    config.validate()?;
    let server = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(server.max_connections)
        .connect(&server.database_url)
        .await?;

    run_migrations(&pool).await?;

    let auth = Arc::new(AuthService::from_config(pool, &config)?);
    let app = create_routes(auth);

    let listener = TcpListener::bind(server.socket_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Credential server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Credential server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
