//! Start-up failures. Anything here ends the process with a non-zero status;
//! request-time problems are handled where they happen.

use crate::config::SettingsError;
use crate::services::session::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration: {0}")]
    Settings(#[from] SettingsError),
    #[error("leptos configuration: {0}")]
    Leptos(String),
    #[error("session verifier: {0}")]
    Verifier(#[from] VerifyError),
    #[error("bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server: {0}")]
    Serve(#[source] std::io::Error),
}
