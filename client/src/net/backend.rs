//! The slice of the hosted auth SDK the broadcaster depends on.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthBroadcaster` only needs to ask "who is signed in" and to hear about
//! auth changes. Keeping that behind a trait lets the browser use
//! [`crate::net::hosted::HostedClient`] while tests drive a scripted fake.

use async_trait::async_trait;

use super::error::BackendError;
use super::types::{Session, User};
use crate::state::observers::Subscription;

/// Auth-change notifications pushed by the backend client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
            Self::PasswordRecovery => "PASSWORD_RECOVERY",
        }
    }
}

/// Session and event primitives of the auth service.
#[async_trait(?Send)]
pub trait AuthBackend {
    /// The authenticated user, verified against the service. `Ok(None)` when
    /// nobody is signed in.
    async fn get_user(&self) -> Result<Option<User>, BackendError>;

    /// The locally held session, refreshed if it has expired.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Register `listener` for auth-change events.
    fn on_auth_state_change(&self, listener: Box<dyn Fn(AuthEvent)>) -> Subscription;
}
