//! Server settings parsed from environment variables.
//!
//! Required:
//! - `MLS_BACKEND_URL`: base URL of the hosted backend
//! - `MLS_BACKEND_ANON_KEY`: its public API key
//!
//! Optional:
//! - `PORT`: listen port, default 3000

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use mls_client::config::{BACKEND_ANON_KEY_VAR, BACKEND_URL_VAR, BackendConfig, ConfigError};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Backend(#[from] ConfigError),
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub backend: BackendConfig,
}

impl Settings {
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the backend pair is missing or invalid,
    /// or `PORT` does not parse.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let backend = BackendConfig::from_parts(lookup(BACKEND_URL_VAR).as_deref(), lookup(BACKEND_ANON_KEY_VAR).as_deref())?;
        let port = match lookup("PORT").map(|raw| raw.trim().to_owned()).filter(|raw| !raw.is_empty()) {
            None => DEFAULT_PORT,
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(SettingsError::InvalidPort(raw)),
            },
        };
        Ok(Self { port, backend })
    }
}
