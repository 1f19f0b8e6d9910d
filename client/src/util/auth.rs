//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use super::services::Services;
use crate::net::types::User;
use crate::state::auth::AuthSnapshot;

/// Redirect to `/login` whenever auth has settled and nobody is signed in.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthSnapshot>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if auth.with(AuthSnapshot::should_redirect_unauth) {
            navigate("/login", NavigateOptions::default());
        }
    });
}

/// Ask the broadcaster to re-check the session, e.g. after a form changed it.
pub fn refresh_auth(services: Option<Services>) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(broadcaster) = services.and_then(Services::broadcaster) {
            leptos::task::spawn_local(broadcaster.refresh_auth());
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = services;
    }
}

/// Display name and email of the signed-in user, if any.
pub fn identity(auth: &AuthSnapshot) -> Option<(String, Option<String>)> {
    auth.user().map(|u| (u.display_name(), u.email.clone()))
}

/// Viewer id once auth has settled: `None` while loading, `Some(None)` for a
/// signed-out visitor. Page loaders key their fetches on this.
pub fn settled_user_id(auth: &AuthSnapshot) -> Option<Option<String>> {
    (!auth.loading).then(|| auth.user().map(|u| u.id.clone()))
}

/// Signed-in user for a page that must not remount on a re-check: while
/// loading, the user from `previous` is kept.
pub fn retained_user(previous: Option<User>, auth: &AuthSnapshot) -> Option<User> {
    if auth.loading { previous } else { auth.user().cloned() }
}
