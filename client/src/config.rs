//! Hosted backend configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle bakes the backend URL and public key in at build time
//! (`option_env!`), while the server reads the same pair from its environment
//! at start-up. Both go through [`BackendConfig::from_parts`] so validation is
//! identical on either side.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const BACKEND_URL_VAR: &str = "MLS_BACKEND_URL";
pub const BACKEND_ANON_KEY_VAR: &str = "MLS_BACKEND_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not set")]
    Missing { var: &'static str },
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Location and public API key of the hosted auth/database/storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    /// Validate a URL/key pair. Blank values count as missing; a trailing `/`
    /// on the URL is trimmed so endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when either value is missing or the URL is not
    /// `http://` / `https://`.
    pub fn from_parts(url: Option<&str>, anon_key: Option<&str>) -> Result<Self, ConfigError> {
        let url = url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing { var: BACKEND_URL_VAR })?;
        let anon_key = anon_key
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing { var: BACKEND_ANON_KEY_VAR })?;

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl { var: BACKEND_URL_VAR, value: url.to_owned() });
        }

        Ok(Self { url: url.trim_end_matches('/').to_owned(), anon_key: anon_key.to_owned() })
    }

    /// Configuration compiled into the client bundle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bundle was built without the variables.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_parts(option_env!("MLS_BACKEND_URL"), option_env!("MLS_BACKEND_ANON_KEY"))
    }

    #[must_use]
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.url)
    }

    #[must_use]
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1{path}", self.url)
    }

    #[must_use]
    pub fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1{path}", self.url)
    }
}
