//! Set a new password, either while signed in or from a recovery link.
//!
//! SYSTEM CONTEXT
//! ==============
//! Recovery links carry `access_token`, `refresh_token` and `type=recovery`.
//! The page adopts those tokens with `set_session` (which emits `SignedIn`
//! for the auth broadcaster), then lets the user choose a new password. A
//! visitor with neither a session nor tokens is sent to `/login`.

#[cfg(test)]
#[path = "update_password_test.rs"]
mod update_password_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::button::Button;
use crate::components::card::Card;
use crate::components::input::Input;
use crate::components::notification::Notification;
use crate::components::page_status::PageLoading;
use crate::state::auth::AuthSnapshot;
use crate::util::services::use_services;
use crate::util::url_params::{NoticeKind, RecoveryTokens, current_location};
use crate::util::validation::validate_new_password;

pub const INVALID_LINK: &str = "Invalid or expired reset link. Please request a new one.";
pub const PASSWORD_UPDATED: &str = "Password reset successfully! Redirecting to dashboard...";

/// Auth has settled without a user and there are no tokens to sign in with.
pub fn needs_login(auth: &AuthSnapshot, has_tokens: bool) -> bool {
    auth.should_redirect_unauth() && !has_tokens
}

#[component]
pub fn UpdatePasswordPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    let navigate = use_navigate();

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let outcome = RwSignal::new(None::<(NoticeKind, String)>);
    let busy = RwSignal::new(false);
    let authenticating = RwSignal::new(false);

    let (search, hash) = current_location();
    let tokens = RecoveryTokens::from_url_parts(&search, &hash);
    let has_tokens = tokens.is_some();

    // Adopt recovery tokens once, unless someone is already signed in.
    let adopt_navigate = navigate.clone();
    let pending_tokens = StoredValue::new(tokens);
    Effect::new(move || {
        if auth.with(|a| a.loading || a.state.is_logged_in) {
            return;
        }
        let Some(tokens) = pending_tokens.try_update_value(Option::take).flatten() else {
            return;
        };
        authenticating.set(true);

        #[cfg(feature = "hydrate")]
        {
            let navigate = adopt_navigate.clone();
            let client = crate::util::services::client_of(services);
            leptos::task::spawn_local(async move {
                let adopted = match client {
                    Some(client) => client.set_session(&tokens.access_token, &tokens.refresh_token).await,
                    None => Err(crate::net::error::BackendError::Unavailable("backend not configured".to_owned())),
                };
                authenticating.set(false);
                if let Err(e) = adopted {
                    log::warn!("recovery link rejected: {e}");
                    outcome.set(Some((NoticeKind::Error, INVALID_LINK.to_owned())));
                    gloo_timers::future::sleep(std::time::Duration::from_secs(3)).await;
                    navigate("/reset-password", NavigateOptions::default());
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (tokens, &adopt_navigate);
        }
    });

    let login_navigate = navigate.clone();
    Effect::new(move || {
        if auth.with(|a| needs_login(a, has_tokens)) {
            login_navigate("/login", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let new_password = password.get_untracked();
        if let Err(e) = validate_new_password(&new_password, &confirm.get_untracked()) {
            outcome.set(Some((NoticeKind::Error, e.to_string())));
            return;
        }
        outcome.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                busy.set(false);
                return;
            };
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let attrs = crate::net::hosted::UserAttributes {
                    password: Some(new_password),
                    ..crate::net::hosted::UserAttributes::default()
                };
                match client.update_user(&attrs).await {
                    Ok(_) => {
                        outcome.set(Some((NoticeKind::Success, PASSWORD_UPDATED.to_owned())));
                        busy.set(false);
                        gloo_timers::future::sleep(std::time::Duration::from_secs(2)).await;
                        navigate("/", NavigateOptions::default());
                    }
                    Err(e) => {
                        log::warn!("password update failed: {e}");
                        outcome.set(Some((NoticeKind::Error, e.to_string())));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (new_password, services, &navigate);
        }
    };

    view! {
        <div class="auth-page">
            <Show
                when=move || !auth.with(|a| a.loading) && !authenticating.get()
                fallback=move || {
                    let label = if authenticating.get() { "Authenticating..." } else { "Loading..." };
                    view! { <PageLoading label=label /> }
                }
            >
                <Card class="auth-card" clone:on_submit>
                    <div class="auth-card__head">
                        <div class="auth-card__badge" aria-hidden="true">"🔒"</div>
                        <h1>"Update Your Password"</h1>
                        <p>"Enter your new password below"</p>
                    </div>
                    <form class="auth-form" on:submit=on_submit.clone() novalidate=true>
                        <Input
                            label="New Password"
                            name="password"
                            value=password
                            input_type="password"
                            placeholder="Enter your new password"
                            autocomplete="new-password"
                            required=true
                        />
                        <Input
                            label="Confirm New Password"
                            name="confirm_password"
                            value=confirm
                            input_type="password"
                            placeholder="Confirm your new password"
                            autocomplete="new-password"
                            required=true
                        />
                        {move || {
                            outcome.get().map(|(kind, message)| view! { <Notification kind=kind message=message /> })
                        }}
                        <Button
                            label="Update Password"
                            kind="submit"
                            busy=busy
                            busy_label="Updating Password..."
                            full_width=true
                        />
                    </form>
                    <p class="auth-card__foot">
                        <a href="/">"Back to Dashboard"</a>
                    </p>
                </Card>
            </Show>
        </div>
    }
}
