//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into the gate middleware via the `State`
//! extractor. It only holds the session verifier; pages are rendered
//! statelessly and all user data lives in the hosted backend.

use std::sync::Arc;

use crate::services::session::SessionVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn SessionVerifier>,
}

impl AppState {
    #[must_use]
    pub fn new(verifier: Arc<dyn SessionVerifier>) -> Self {
        Self { verifier }
    }
}
