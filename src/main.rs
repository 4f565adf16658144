//! todo-api server entry point.
//!
//! Connects the store, ensures the schema, and starts the Axum HTTP server.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use todo_api::api;
use todo_api::app_state::AppState;
use todo_api::config::AppConfig;
use todo_api::persistence::PostgresTodoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "fatal startup error");
        return Err(err);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting todo-api");

    let store = PostgresTodoStore::connect(&config.database).await?;
    tracing::info!("connected to database");

    let cors = api::cors_layer(&config.cors_allowed_origins)?;
    let app = api::build_app(AppState::new(store), cors);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Installs the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
