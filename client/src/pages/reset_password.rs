//! Request a password-reset email.
//!
//! The emailed link may come back here instead of `/update-password`
//! (depending on the backend's site URL). When recovery tokens are present in
//! the query string or fragment they are forwarded straight on.

#[cfg(test)]
#[path = "reset_password_test.rs"]
mod reset_password_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::button::Button;
use crate::components::card::Card;
use crate::components::input::Input;
use crate::components::notification::Notification;
use crate::util::services::use_services;
use crate::util::url_params::{NoticeKind, RecoveryTokens, current_location};
use crate::util::validation::validate_email;

pub const RESET_SENT: &str = "Password reset email sent! Check your inbox and spam folder.";

/// Link target for the reset email.
pub fn recovery_redirect(origin: &str) -> Option<String> {
    (!origin.is_empty()).then(|| format!("{origin}/update-password"))
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let services = use_services();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let outcome = RwSignal::new(None::<(NoticeKind, String)>);
    let busy = RwSignal::new(false);

    let forward = navigate.clone();
    Effect::new(move || {
        let (search, hash) = current_location();
        if let Some(tokens) = RecoveryTokens::from_url_parts(&search, &hash) {
            forward(&tokens.update_password_href(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let email_value = email.get_untracked().trim().to_owned();
        if let Err(e) = validate_email(&email_value) {
            outcome.set(Some((NoticeKind::Error, e.to_string())));
            return;
        }
        outcome.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                outcome.set(Some((NoticeKind::Error, "Password reset is unavailable right now.".to_owned())));
                busy.set(false);
                return;
            };
            let redirect = recovery_redirect(&crate::util::url_params::current_origin());
            leptos::task::spawn_local(async move {
                match client.reset_password_for_email(&email_value, redirect.as_deref()).await {
                    Ok(()) => {
                        outcome.set(Some((NoticeKind::Success, RESET_SENT.to_owned())));
                        email.set(String::new());
                    }
                    Err(e) => {
                        log::warn!("password reset request failed: {e}");
                        outcome.set(Some((NoticeKind::Error, e.to_string())));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, services);
        }
    };

    view! {
        <div class="auth-page">
            <Card class="auth-card">
                <div class="auth-card__head">
                    <div class="auth-card__badge" aria-hidden="true">"🔑"</div>
                    <h1>"Reset Your Password"</h1>
                    <p>"Enter your email address and we'll send you a link to reset your password"</p>
                </div>
                <form class="auth-form" on:submit=on_submit novalidate=true>
                    <Input
                        label="Email Address"
                        name="email"
                        value=email
                        input_type="email"
                        placeholder="Enter your email address"
                        autocomplete="email"
                        required=true
                    />
                    {move || {
                        outcome.get().map(|(kind, message)| view! { <Notification kind=kind message=message /> })
                    }}
                    <Button
                        label="Send Reset Email"
                        kind="submit"
                        busy=busy
                        busy_label="Sending Reset Email..."
                        full_width=true
                    />
                </form>
                <p class="auth-card__foot">
                    "Remember your password? "
                    <a href="/login">"Sign in"</a>
                </p>
            </Card>
        </div>
    }
}
