//! Page loader state.
//!
//! DESIGN
//! ======
//! Every page fetches independently: set `Loading`, run its fetches, then
//! store `Ready` or `Failed`. Failures are logged with their real cause and
//! shown with a fixed, page-specific message.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use std::fmt::Display;
use std::future::Future;

use leptos::prelude::*;

use super::services::Services;
use crate::net::error::BackendError;
use crate::net::hosted::HostedClient;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    /// Map a fetch result, logging the error and replacing it with `message`.
    pub fn from_result<E: Display>(result: Result<T, E>, message: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                log::error!("{message}: {e}");
                Self::Failed(message.to_owned())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Edit loaded data in place, e.g. after a write succeeded.
    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> LoadState<Option<T>> {
    /// Treat a successful fetch that found nothing as a failure with
    /// `not_found`.
    #[must_use]
    pub fn require(self, not_found: &str) -> LoadState<T> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Ready(Some(value)) => LoadState::Ready(value),
            Self::Ready(None) => LoadState::Failed(not_found.to_owned()),
            Self::Failed(message) => LoadState::Failed(message),
        }
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// A page's [`LoadState`] signal plus a generation counter. Each `load` bumps
/// the generation; a fetch that finishes after a newer one started is
/// dropped, so a fast route change never shows the previous route's data.
pub struct Loader<T: Send + Sync + 'static> {
    pub state: RwSignal<LoadState<T>>,
    generation: StoredValue<u64>,
}

impl<T: Send + Sync + 'static> Clone for Loader<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for Loader<T> {}

impl<T: Send + Sync + 'static> Loader<T> {
    pub fn new() -> Self {
        Self { state: RwSignal::new(LoadState::Loading), generation: StoredValue::new(0) }
    }

    /// Fetch with the backend client and store the outcome, replacing errors
    /// with `message`.
    pub fn load<F, Fut>(self, services: Option<Services>, message: &'static str, fetch: F)
    where
        F: FnOnce(HostedClient) -> Fut + 'static,
        Fut: Future<Output = Result<T, BackendError>> + 'static,
    {
        self.run(services, fetch, move |result| LoadState::from_result(result, message));
    }

    /// Like [`Loader::load`], for fetches where a missing row is an error
    /// shown as `not_found`.
    pub fn load_required<F, Fut>(
        self,
        services: Option<Services>,
        message: &'static str,
        not_found: &'static str,
        fetch: F,
    ) where
        F: FnOnce(HostedClient) -> Fut + 'static,
        Fut: Future<Output = Result<Option<T>, BackendError>> + 'static,
    {
        self.run(services, fetch, move |result| LoadState::from_result(result, message).require(not_found));
    }

    fn run<R, F, Fut, S>(self, services: Option<Services>, fetch: F, settle: S)
    where
        F: FnOnce(HostedClient) -> Fut + 'static,
        Fut: Future<Output = Result<R, BackendError>> + 'static,
        S: FnOnce(Result<R, BackendError>) -> LoadState<T> + 'static,
    {
        let generation = self.generation.get_value() + 1;
        self.generation.set_value(generation);
        self.state.set(LoadState::Loading);

        let Some(client) = services.and_then(Services::client) else {
            // Server render: leave the page in its loading state for hydration.
            #[cfg(feature = "hydrate")]
            self.state.set(settle(Err(BackendError::Unavailable("backend not configured".to_owned()))));
            #[cfg(not(feature = "hydrate"))]
            let _ = (fetch, settle);
            return;
        };

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = fetch(client).await;
            if self.generation.try_get_value() == Some(generation) {
                self.state.set(settle(result));
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (client, fetch, settle);
    }
}

impl<T: Send + Sync + 'static> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}
