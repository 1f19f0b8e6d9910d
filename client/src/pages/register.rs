//! Account registration. A confirmation email goes out and the visitor lands
//! on `/check-email`; the link in the email comes back to
//! `/?emailConfirmed=true`.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::button::Button;
use crate::components::card::Card;
use crate::components::input::Input;
use crate::util::services::use_services;
use crate::util::validation::{ValidationError, validate_registration};

/// Validated registration fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// # Errors
    ///
    /// The first failing field.
    pub fn parse(full_name: &str, email: &str, password: &str, confirm: &str) -> Result<Self, ValidationError> {
        let (full_name, email) = (full_name.trim(), email.trim());
        validate_registration(full_name, email, password, confirm)?;
        Ok(Self { full_name: full_name.to_owned(), email: email.to_owned(), password: password.to_owned() })
    }
}

/// Where the confirmation link should send the new user.
pub fn confirmation_redirect(origin: &str) -> Option<String> {
    (!origin.is_empty()).then(|| format!("{origin}/?emailConfirmed=true"))
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let services = use_services();
    let navigate = use_navigate();

    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let parsed = Registration::parse(
            &full_name.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm.get_untracked(),
        );
        let registration = match parsed {
            Ok(registration) => registration,
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
                error.set(Some("Registration is unavailable right now.".to_owned()));
                busy.set(false);
                return;
            };
            let navigate = navigate.clone();
            let redirect = confirmation_redirect(&crate::util::url_params::current_origin());
            leptos::task::spawn_local(async move {
                let result = client
                    .sign_up(&registration.email, &registration.password, &registration.full_name, redirect.as_deref())
                    .await;
                match result {
                    Ok(_) => {
                        log::info!("registered {}", registration.email);
                        navigate("/check-email", NavigateOptions::default());
                    }
                    Err(e) => {
                        log::warn!("sign up failed: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (registration, services, &navigate);
        }
    };

    view! {
        <div class="auth-page">
            <Card class="auth-card">
                <div class="auth-card__head">
                    <h1>"Create Account"</h1>
                    <p>"Join MLS Learning Engine and start learning"</p>
                </div>
                <form class="auth-form" on:submit=on_submit novalidate=true>
                    <Input
                        label="Full Name"
                        name="full_name"
                        value=full_name
                        placeholder="Enter your full name"
                        autocomplete="name"
                        required=true
                    />
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
                        placeholder="At least 6 characters"
                        autocomplete="new-password"
                        required=true
                    />
                    <Input
                        label="Confirm Password"
                        name="confirm_password"
                        value=confirm
                        input_type="password"
                        placeholder="Repeat your password"
                        autocomplete="new-password"
                        required=true
                    />
                    <Show when=move || error.with(Option::is_some)>
                        <p class="form-error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <Button
                        label="Create Account"
                        kind="submit"
                        busy=busy
                        busy_label="Creating Account..."
                        full_width=true
                    />
                </form>
                <p class="auth-card__foot">
                    "Already have an account? "
                    <a href="/login">"Sign in"</a>
                </p>
            </Card>
        </div>
    }
}
