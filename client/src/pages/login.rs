//! Email + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! A successful sign-in makes the hosted client emit `SignedIn`; the auth
//! broadcaster re-checks the session from that event, so this page only
//! navigates home afterwards.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::button::Button;
use crate::components::card::Card;
use crate::components::input::Input;
use crate::state::auth::AuthSnapshot;
use crate::util::services::use_services;
use crate::util::validation::{ValidationError, validate_login};

/// Trimmed email and raw password, or the first validation problem.
pub fn login_input(email: &str, password: &str) -> Result<(String, String), ValidationError> {
    let email = email.trim();
    validate_login(email, password)?;
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    // Already signed in: nothing to do here.
    let navigate_home = navigate.clone();
    Effect::new(move || {
        if auth.with(|a| !a.loading && a.state.is_logged_in) {
            navigate_home("/", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, password_value) = match login_input(&email.get_untracked(), &password.get_untracked()) {
            Ok(input) => input,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        error.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                error.set(Some("Sign-in is unavailable right now.".to_owned()));
                busy.set(false);
                return;
            };
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match client.sign_in_with_password(&email_value, &password_value).await {
                    Ok(_) => navigate("/", NavigateOptions::default()),
                    Err(e) => {
                        log::warn!("sign in failed: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, password_value, services, &navigate);
        }
    };

    view! {
        <div class="auth-page">
            <Card class="auth-card">
                <div class="auth-card__head">
                    <h1>"Sign In"</h1>
                    <p>"Welcome back to MLS Learning Engine"</p>
                </div>
                <form class="auth-form" on:submit=on_submit novalidate=true>
                    <Input
                        label="Email"
                        name="email"
                        value=email
                        input_type="email"
                        placeholder="Enter your email"
                        autocomplete="email"
                        required=true
                    />
                    <Input
                        label="Password"
                        name="password"
                        value=password
                        input_type="password"
                        placeholder="Enter your password"
                        autocomplete="current-password"
                        required=true
                    />
                    <div class="auth-form__row">
                        <a href="/reset-password">"Forgot password?"</a>
                    </div>
                    <Show when=move || error.with(Option::is_some)>
                        <p class="form-error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <Button label="Sign In" kind="submit" busy=busy busy_label="Signing In..." full_width=true />
                </form>
                <p class="auth-card__foot">
                    "Don't have an account? "
                    <a href="/register">"Sign up"</a>
                </p>
            </Card>
        </div>
    }
}
