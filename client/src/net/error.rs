//! Failures surfaced by the hosted backend client.
//!
//! ERROR HANDLING
//! ==============
//! Messages are passed through from the backend verbatim where possible; the
//! UI treats them as opaque strings and never branches on their text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No browser runtime (server render) or no backend configured.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("storage error: {0}")]
    Storage(String),
}

impl BackendError {
    /// Build an [`BackendError::Api`] from a non-2xx response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Api { status, message: api_error_message(status, body) }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pick the human-readable message out of an error body. The auth, REST and
/// storage services use different keys for it.
#[must_use]
pub fn api_error_message(status: u16, body: &str) -> String {
    const KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in KEYS {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                if !text.trim().is_empty() {
                    return text.to_owned();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        format!("request failed: {status}")
    } else {
        trimmed.to_owned()
    }
}
