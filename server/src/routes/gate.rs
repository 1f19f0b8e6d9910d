//! Session gate for page routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs in front of the Leptos page handlers. Public pages and assets pass
//! straight through; everything else needs an access-token cookie the auth
//! service still recognises, or the visitor is sent to `/login`. A lapsed or
//! missing access token is renewed with the refresh-token cookie, and the new
//! tokens are written back on the response so the browser picks them up.
//!
//! ERROR HANDLING
//! ==============
//! If the auth service cannot be reached the request is let through and the
//! failure logged. The client-side auth check still signs the visitor out.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use mls_client::net::hosted::{ACCESS_TOKEN_COOKIE, REFRESH_COOKIE_MAX_AGE_SECS, REFRESH_TOKEN_COOKIE, session_cookie};

use crate::services::session::RenewedSession;
use crate::state::AppState;

/// Path prefixes served without a session.
pub const PUBLIC_PREFIXES: [&str; 9] = [
    "/login",
    "/auth",
    "/register",
    "/check-email",
    "/reset-password",
    "/update-password",
    "/pkg",
    "/healthz",
    "/favicon",
];

pub const LOGIN_PATH: &str = "/login";

#[must_use]
pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn cookie<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(Cookie::value).filter(|v| !v.is_empty())
}

/// Axum middleware: redirect unauthenticated requests for protected pages.
pub async fn require_session(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if is_public(&path) {
        return next.run(request).await;
    }

    if let Some(token) = cookie(&jar, ACCESS_TOKEN_COOKIE) {
        match state.verifier.verify(token).await {
            Ok(Some(user)) => {
                tracing::debug!(%path, user_id = %user.id, "session verified");
                return next.run(request).await;
            }
            Ok(None) => tracing::debug!(%path, "access token rejected"),
            Err(e) => {
                tracing::warn!(%path, error = %e, "session check failed; letting request through");
                return next.run(request).await;
            }
        }
    }

    let Some(refresh_token) = cookie(&jar, REFRESH_TOKEN_COOKIE) else {
        tracing::debug!(%path, "no session cookie; redirecting to login");
        return to_login(false);
    };

    match state.verifier.renew(refresh_token).await {
        Ok(Some(session)) => {
            tracing::debug!(%path, user_id = %session.user.id, "session renewed");
            let mut response = next.run(request).await;
            write_session_cookies(&mut response, Some(&session));
            response
        }
        Ok(None) => {
            tracing::debug!(%path, "refresh token rejected; redirecting to login");
            to_login(true)
        }
        Err(e) => {
            tracing::warn!(%path, error = %e, "session renewal failed; letting request through");
            next.run(request).await
        }
    }
}

fn to_login(clear_cookies: bool) -> Response {
    let mut response = Redirect::temporary(LOGIN_PATH).into_response();
    if clear_cookies {
        write_session_cookies(&mut response, None);
    }
    response
}

/// Append `Set-Cookie` headers for both session cookies; `None` expires them.
pub fn write_session_cookies(response: &mut Response, session: Option<&RenewedSession>) {
    let cookies = match session {
        Some(s) => [
            session_cookie(ACCESS_TOKEN_COOKIE, Some(&s.access_token), s.expires_in.max(0)),
            session_cookie(REFRESH_TOKEN_COOKIE, Some(&s.refresh_token), REFRESH_COOKIE_MAX_AGE_SECS),
        ],
        None => [session_cookie(ACCESS_TOKEN_COOKIE, None, 0), session_cookie(REFRESH_TOKEN_COOKIE, None, 0)],
    };
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "session cookie is not a valid header value"),
        }
    }
}
