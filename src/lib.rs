pub mod accounts;
pub mod adapters;
mod app;
mod assets;
pub mod attendance;
pub mod auth;
pub mod config;
pub mod courses;
pub mod instructors;
pub mod members;
pub mod notifications;
pub mod ports;
pub mod schedule;
pub mod seed;
pub mod state;
pub mod status;
pub mod store;
pub mod subscriptions;
pub mod telemetry;
mod templates;
pub mod types;

pub use app::router;

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    State(#[from] state::StateError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn serve(config: config::AppConfig) -> Result<(), ServeError> {
    let addr = config.addr;
    let state = state::AppState::new(config, Arc::new(adapters::SystemClock))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, data_dir = %state.config.data_dir.display(), "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
