mod app;
mod models;
mod handlers;
mod services;
mod middleware;
mod views;
mod state;
mod config;
mod errors;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use crate::{
    config::Config,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let state = AppState::from_config(&config);
    state.store
        .ensure_layout()
        .await
        .context("Failed to prepare data directories")?;

    let app = app::router(state, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}
