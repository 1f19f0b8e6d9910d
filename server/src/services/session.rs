//! Server-side session verification.
//!
//! ARCHITECTURE
//! ============
//! The browser keeps its session in `localStorage` and mirrors both tokens
//! into cookies. The gate middleware hands the access token to a
//! [`SessionVerifier`], which asks the hosted auth service who it belongs to.
//! When the access token has lapsed the verifier trades the refresh token for
//! a new session, which the gate writes back as cookies. The trait is the
//! seam tests replace with an in-memory fake.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Duration;

use mls_client::config::BackendConfig;
use serde::Deserialize;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// The user an access token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifiedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("auth request failed: {0}")]
    Request(String),
    #[error("auth service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("auth response decode failed: {0}")]
    Decode(String),
}

/// Tokens issued when a session is renewed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenewedSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: i64,
    pub user: VerifiedUser,
}

/// Resolves session tokens to their user.
#[async_trait::async_trait]
pub trait SessionVerifier: Send + Sync {
    /// `Ok(None)` when the token is unknown or expired.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when the auth service cannot be asked.
    async fn verify(&self, access_token: &str) -> Result<Option<VerifiedUser>, VerifyError>;

    /// Trade a refresh token for a new session. `Ok(None)` when the refresh
    /// token is unknown, revoked or already used.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when the auth service cannot be asked.
    async fn renew(&self, refresh_token: &str) -> Result<Option<RenewedSession>, VerifyError>;
}

// =============================================================================
// HOSTED VERIFIER
// =============================================================================

/// Verifies tokens with `GET {url}/auth/v1/user`.
pub struct HostedVerifier {
    http: reqwest::Client,
    config: BackendConfig,
}

impl HostedVerifier {
    /// # Errors
    ///
    /// Returns [`VerifyError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: BackendConfig) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| VerifyError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.config.url)
    }

    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/auth/v1/token", self.config.url)
    }
}

#[async_trait::async_trait]
impl SessionVerifier for HostedVerifier {
    async fn verify(&self, access_token: &str) -> Result<Option<VerifiedUser>, VerifyError> {
        let response = self
            .http
            .get(self.user_url())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| VerifyError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| VerifyError::Request(e.to_string()))?;
        parse_user_response(status, &text)
    }

    async fn renew(&self, refresh_token: &str) -> Result<Option<RenewedSession>, VerifyError> {
        let response = self
            .http
            .post(self.token_url())
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| VerifyError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| VerifyError::Request(e.to_string()))?;
        parse_renew_response(status, &text)
    }
}

/// Interpret the auth service's answer: 2xx carries the user, 401/403 means
/// the token is not (or no longer) valid.
///
/// # Errors
///
/// [`VerifyError::Status`] for any other status, [`VerifyError::Decode`] for
/// a malformed success body.
pub fn parse_user_response(status: u16, body: &str) -> Result<Option<VerifiedUser>, VerifyError> {
    match status {
        200..=299 => serde_json::from_str(body).map(Some).map_err(|e| VerifyError::Decode(e.to_string())),
        401 | 403 => Ok(None),
        _ => Err(VerifyError::Status { status, body: body.to_owned() }),
    }
}

/// Interpret a refresh-token grant: 2xx carries the new session, 400/401/403
/// mean the refresh token is no good.
///
/// # Errors
///
/// [`VerifyError::Status`] for any other status, [`VerifyError::Decode`] for
/// a malformed success body.
pub fn parse_renew_response(status: u16, body: &str) -> Result<Option<RenewedSession>, VerifyError> {
    match status {
        200..=299 => serde_json::from_str(body).map(Some).map_err(|e| VerifyError::Decode(e.to_string())),
        400 | 401 | 403 => Ok(None),
        _ => Err(VerifyError::Status { status, body: body.to_owned() }),
    }
}
