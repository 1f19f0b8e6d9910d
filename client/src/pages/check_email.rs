//! Shown after registration while the confirmation email is on its way.

use leptos::prelude::*;

use crate::components::card::Card;

#[component]
pub fn CheckEmailPage() -> impl IntoView {
    view! {
        <div class="auth-page">
            <Card class="auth-card auth-card--centered">
                <div class="auth-card__badge" aria-hidden="true">"✉"</div>
                <h1>"Check Your Email"</h1>
                <p>
                    "We've sent you a confirmation email. Please check your inbox and click the "
                    "confirmation link to activate your account."
                </p>
                <p class="auth-card__hint">
                    <strong>"Didn't receive the email?"</strong>
                    " Check your spam folder or try registering again."
                </p>
                <div class="auth-card__actions">
                    <a class="btn btn--primary" href="/login">"Back to Login"</a>
                    <a class="btn btn--outline" href="/">"Go Home"</a>
                </div>
            </Card>
        </div>
    }
}
