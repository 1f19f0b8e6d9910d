//! Auth-session state for the current browser tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthBroadcaster` is the single source of truth for "is a user signed in".
//! The root component constructs one, hands it to Leptos context, and pages
//! observe it through an `RwSignal<AuthSnapshot>` instead of each asking the
//! backend on their own.
//!
//! STATE MACHINE
//! =============
//! Two externally visible states: `loading` and resolved(`is_logged_in`).
//! Transitions come only from `refresh_auth` and backend auth events; there
//! are no timers. A failed check resolves to logged-out. Each transition bumps
//! an epoch, and a check whose epoch is no longer current is dropped, so a
//! slow check can never overwrite a later sign-out. A token refresh that
//! happens inside a running check is not treated as a new transition, since
//! that check already reports the refreshed session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::observers::{Observers, Subscription};
use crate::net::backend::{AuthBackend, AuthEvent};
use crate::net::error::BackendError;
use crate::net::types::{Session, User};

/// Schedules a future on the local event loop (`spawn_local` in the browser).
pub type SpawnLocal = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// What the backend last told us about the current user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub is_logged_in: bool,
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl AuthState {
    #[must_use]
    pub fn signed_in(user: User, session: Option<Session>) -> Self {
        Self { is_logged_in: true, user: Some(user), session }
    }
}

/// Auth state plus the loading flag, as observed by UI components.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSnapshot {
    pub state: AuthState,
    pub loading: bool,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self { state: AuthState::default(), loading: true }
    }
}

impl AuthSnapshot {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    /// Auth has settled and nobody is signed in.
    #[must_use]
    pub fn should_redirect_unauth(&self) -> bool {
        !self.loading && !self.state.is_logged_in
    }
}

/// Ask the backend who is signed in.
///
/// # Errors
///
/// Propagates the first failing backend call.
pub async fn check_user_auth(backend: &dyn AuthBackend) -> Result<AuthState, BackendError> {
    let Some(user) = backend.get_user().await? else {
        return Ok(AuthState::default());
    };
    let session = backend.get_session().await?;
    Ok(AuthState::signed_in(user, session))
}

struct Inner {
    backend: Rc<dyn AuthBackend>,
    spawn: SpawnLocal,
    snapshot: RefCell<AuthSnapshot>,
    observers: Observers<AuthSnapshot>,
    initialized: Cell<bool>,
    epoch: Cell<u64>,
    checks_in_flight: Cell<u32>,
    backend_subscription: RefCell<Option<Subscription>>,
}

/// Caches auth state and fans it out to subscribers. Cloning shares the same
/// underlying broadcaster.
#[derive(Clone)]
pub struct AuthBroadcaster {
    inner: Rc<Inner>,
}

impl AuthBroadcaster {
    #[must_use]
    pub fn new(backend: Rc<dyn AuthBackend>, spawn: SpawnLocal) -> Self {
        Self {
            inner: Rc::new(Inner {
                backend,
                spawn,
                snapshot: RefCell::new(AuthSnapshot::default()),
                observers: Observers::new(),
                initialized: Cell::new(false),
                epoch: Cell::new(0),
                checks_in_flight: Cell::new(0),
                backend_subscription: RefCell::new(None),
            }),
        }
    }

    /// Register the backend event listener and run the initial check.
    ///
    /// Only the first call does anything; later calls return a future that
    /// completes immediately. Registration happens before this returns.
    pub fn initialize(&self) -> LocalBoxFuture<'static, ()> {
        if self.inner.initialized.replace(true) {
            return Box::pin(async {});
        }

        let weak = Rc::downgrade(&self.inner);
        let subscription = self.inner.backend.on_auth_state_change(Box::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.handle_event(event);
            }
        }));
        *self.inner.backend_subscription.borrow_mut() = Some(subscription);

        let epoch = self.next_epoch();
        let this = self.clone();
        Box::pin(async move { this.resolve(epoch).await })
    }

    /// Register `callback` for `(state, loading)` on every change. It is
    /// invoked once right away with the cached state.
    pub fn subscribe(&self, callback: impl Fn(&AuthState, bool) + 'static) -> Subscription {
        let current = self.current();
        callback(&current.state, current.loading);
        self.inner
            .observers
            .subscribe(move |snapshot: &AuthSnapshot| callback(&snapshot.state, snapshot.loading))
    }

    /// Re-check against the backend. `loading = true` is broadcast before
    /// this returns; the resolved state is broadcast when the future settles.
    pub fn refresh_auth(&self) -> LocalBoxFuture<'static, ()> {
        let epoch = self.next_epoch();
        let state = self.inner.snapshot.borrow().state.clone();
        self.publish(state, true);

        let this = self.clone();
        Box::pin(async move { this.resolve(epoch).await })
    }

    #[must_use]
    pub fn current(&self) -> AuthSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Drop the backend listener and every subscriber. Runs when the page
    /// unloads; calling it again does nothing more.
    pub fn shutdown(&self) {
        let subscription = self.inner.backend_subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.inner.observers.clear();
        self.next_epoch();
    }

    fn handle_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::TokenRefreshed if self.inner.checks_in_flight.get() > 0 => {
                log::debug!("token refreshed during auth check");
            }
            AuthEvent::SignedIn | AuthEvent::TokenRefreshed => {
                let epoch = self.next_epoch();
                let this = self.clone();
                (self.inner.spawn)(Box::pin(async move { this.resolve(epoch).await }));
            }
            AuthEvent::SignedOut => {
                self.next_epoch();
                self.publish(AuthState::default(), false);
            }
            other => log::debug!("ignoring auth event {}", other.as_str()),
        }
    }

    async fn resolve(&self, epoch: u64) {
        let result = {
            let _check = InFlight::enter(&self.inner.checks_in_flight);
            check_user_auth(self.inner.backend.as_ref()).await
        };
        if self.inner.epoch.get() != epoch {
            log::debug!("discarding superseded auth check");
            return;
        }
        let state = result.unwrap_or_else(|e| {
            log::error!("auth check failed: {e}");
            AuthState::default()
        });
        self.publish(state, false);
    }

    fn next_epoch(&self) -> u64 {
        let epoch = self.inner.epoch.get() + 1;
        self.inner.epoch.set(epoch);
        epoch
    }

    fn publish(&self, state: AuthState, loading: bool) {
        let snapshot = AuthSnapshot { state, loading };
        *self.inner.snapshot.borrow_mut() = snapshot.clone();
        self.inner.observers.notify(&snapshot);
    }
}

/// Counts a running auth check for as long as it is alive, including when
/// its future is dropped early.
struct InFlight<'a>(&'a Cell<u32>);

impl<'a> InFlight<'a> {
    fn enter(count: &'a Cell<u32>) -> Self {
        count.set(count.get() + 1);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}
