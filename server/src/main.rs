#![recursion_limit = "256"]

mod config;
mod error;
mod routes;
mod services;
mod state;

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::error::ServerError;
use crate::services::session::HostedVerifier;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let settings = Settings::from_env()?;
    tracing::info!(backend = %settings.backend.url, "backend configured");

    let verifier = HostedVerifier::new(settings.backend.clone())?;
    let state = state::AppState::new(Arc::new(verifier));
    let app = routes::app(state)?;

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;

    tracing::info!(%addr, "mls listening");
    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
