//! Client for the hosted auth / database / storage service.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend exposes three HTTP surfaces under one base URL: `/auth/v1`
//! (sessions and users), `/rest/v1` (tables and RPC functions) and
//! `/storage/v1` (file buckets). `HostedClient` wraps all three and owns the
//! signed-in session for the tab.
//!
//! DESIGN
//! ======
//! Every operation first builds an [`HttpRequest`], a plain description of
//! method, URL, query pairs, headers and JSON body, and then hands it to the
//! client's [`Transport`]. Building is pure; the default [`FetchTransport`]
//! touches the network only with the `hydrate` feature and returns
//! [`BackendError::Unavailable`] on the server. Tests swap in a scripted
//! transport.
//!
//! The session is persisted to `localStorage` and both tokens are mirrored
//! into cookies so the server-side gate can tell signed-in visitors apart and
//! renew an expired access token.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`BackendError::Api`] carrying the backend's own
//! message; storage failures are re-tagged as [`BackendError::Storage`].

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "hosted_test.rs"]
mod hosted_test;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::backend::{AuthBackend, AuthEvent};
use super::error::BackendError;
use super::query::{Query, SINGLE_OBJECT};
use super::types::{Session, User};
use crate::config::BackendConfig;
use crate::state::observers::{Observers, Subscription};
use crate::util::clock::now_secs;

/// `localStorage` key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "mls.auth.session";

/// Cookie carrying the access token for server-side route checks.
pub const ACCESS_TOKEN_COOKIE: &str = "mls-access-token";

/// Cookie carrying the refresh token so the gate can renew a lapsed session.
pub const REFRESH_TOKEN_COOKIE: &str = "mls-refresh-token";

/// Lifetime of the refresh-token cookie.
pub const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Lifetime assumed for sessions adopted from recovery links, which carry no
/// expiry of their own.
const ADOPTED_SESSION_SECS: i64 = 3600;

// =============================================================================
// REQUEST DESCRIPTION
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request ready to be sent.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    fn new(method: Method, url: String) -> Self {
        Self { method, url, query: Vec::new(), headers: Vec::new(), body: None }
    }

    fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of header `name` (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Fields accepted by `update_user`. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Merged into `user_metadata`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// An entry returned by a bucket listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StorageObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// `Set-Cookie`-style string for `document.cookie` or a response header.
/// `None` expires the cookie.
#[must_use]
pub fn session_cookie(name: &str, token: Option<&str>, max_age_secs: i64) -> String {
    match token {
        Some(token) => format!("{name}={token}; Path=/; Max-Age={max_age_secs}; SameSite=Lax"),
        None => format!("{name}=; Path=/; Max-Age=0; SameSite=Lax"),
    }
}

/// Value of cookie `name` in a `document.cookie` / `Cookie` header string.
#[must_use]
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Bring a stored session in line with the token cookies. The server gate
/// may have renewed the session on a page load and rewritten the cookies;
/// the cookie pair then wins over the copy in `localStorage`.
#[must_use]
pub fn reconcile_with_cookies(stored: Option<Session>, cookies: &str, now_secs: i64) -> Option<Session> {
    let mut session = stored?;
    let (Some(access), Some(refresh)) =
        (cookie_value(cookies, ACCESS_TOKEN_COOKIE), cookie_value(cookies, REFRESH_TOKEN_COOKIE))
    else {
        return Some(session);
    };
    if refresh == session.refresh_token {
        return Some(session);
    }
    log::debug!("adopting session renewed by the server");
    session.access_token = access.to_owned();
    session.refresh_token = refresh.to_owned();
    session.expires_in = ADOPTED_SESSION_SECS;
    session.expires_at = None;
    Some(session.stamped(now_secs))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

fn storage_error(error: BackendError) -> BackendError {
    match error {
        BackendError::Api { message, .. } => BackendError::Storage(message),
        other => other,
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends a described request and returns the response body.
#[async_trait(?Send)]
pub trait Transport {
    /// # Errors
    ///
    /// [`BackendError::Api`] for non-2xx responses, [`BackendError::Network`]
    /// when the request cannot be made.
    async fn send(&self, req: HttpRequest) -> Result<String, BackendError>;
}

/// Browser `fetch` through gloo-net. Without `hydrate` there is no network
/// and every request fails with [`BackendError::Unavailable`].
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<String, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            transmit(&req, None).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = req;
            Err(BackendError::Unavailable("not available on server".to_owned()))
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

struct ClientInner {
    config: BackendConfig,
    transport: Rc<dyn Transport>,
    session: RefCell<Option<Session>>,
    events: Observers<AuthEvent>,
}

/// Handle to the hosted backend. Clones share the session and event list.
#[derive(Clone)]
pub struct HostedClient {
    inner: Rc<ClientInner>,
}

impl HostedClient {
    /// A client with no session, talking to the network.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self::with_transport(config, Rc::new(FetchTransport))
    }

    #[must_use]
    pub fn with_transport(config: BackendConfig, transport: Rc<dyn Transport>) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                config,
                transport,
                session: RefCell::new(None),
                events: Observers::new(),
            }),
        }
    }

    /// A client resuming the session persisted by a previous page load.
    #[must_use]
    pub fn restore(config: BackendConfig) -> Self {
        let client = Self::new(config);
        let session = reconcile_with_cookies(load_persisted_session(), &read_cookies(), now_secs());
        client.store_session(session);
        client
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// The cached session, without checking expiry.
    #[must_use]
    pub fn cached_session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    fn access_token(&self) -> Option<String> {
        self.inner.session.borrow().as_ref().map(|s| s.access_token.clone())
    }

    fn store_session(&self, session: Option<Session>) {
        persist_session(session.as_ref());
        *self.inner.session.borrow_mut() = session;
    }

    fn emit(&self, event: AuthEvent) {
        log::debug!("auth event {}", event.as_str());
        self.inner.events.notify(&event);
    }

    async fn send(&self, req: HttpRequest) -> Result<String, BackendError> {
        self.inner.transport.send(req).await
    }

    // -------------------------------------------------------------------------
    // request builders
    // -------------------------------------------------------------------------

    /// Request carrying the anon key and a bearer token: `token` when given,
    /// otherwise the session's access token, otherwise the anon key.
    fn request(&self, method: Method, url: String, token: Option<&str>) -> HttpRequest {
        let bearer = token.map(str::to_owned).or_else(|| self.access_token());
        let bearer = bearer.unwrap_or_else(|| self.inner.config.anon_key.clone());
        HttpRequest::new(method, url)
            .header("apikey", self.inner.config.anon_key.clone())
            .header("Authorization", format!("Bearer {bearer}"))
    }

    fn password_grant_request(&self, email: &str, password: &str) -> HttpRequest {
        let url = self.inner.config.auth_url("/token");
        HttpRequest::new(Method::Post, url)
            .header("apikey", self.inner.config.anon_key.clone())
            .query("grant_type", "password")
            .json(json!({ "email": email, "password": password }))
    }

    fn refresh_request(&self, refresh_token: &str) -> HttpRequest {
        let url = self.inner.config.auth_url("/token");
        HttpRequest::new(Method::Post, url)
            .header("apikey", self.inner.config.anon_key.clone())
            .query("grant_type", "refresh_token")
            .json(json!({ "refresh_token": refresh_token }))
    }

    fn sign_up_request(&self, email: &str, password: &str, full_name: &str, redirect_to: Option<&str>) -> HttpRequest {
        let url = self.inner.config.auth_url("/signup");
        let mut req = HttpRequest::new(Method::Post, url)
            .header("apikey", self.inner.config.anon_key.clone())
            .json(json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }));
        if let Some(redirect_to) = redirect_to {
            req = req.query("redirect_to", redirect_to);
        }
        req
    }

    fn sign_out_request(&self) -> HttpRequest {
        self.request(Method::Post, self.inner.config.auth_url("/logout"), None)
    }

    fn get_user_request(&self, token: &str) -> HttpRequest {
        self.request(Method::Get, self.inner.config.auth_url("/user"), Some(token))
    }

    fn update_user_request(&self, attrs: &UserAttributes) -> HttpRequest {
        let body = serde_json::to_value(attrs).unwrap_or(Value::Null);
        self.request(Method::Put, self.inner.config.auth_url("/user"), None).json(body)
    }

    fn recover_request(&self, email: &str, redirect_to: Option<&str>) -> HttpRequest {
        let mut req = self
            .request(Method::Post, self.inner.config.auth_url("/recover"), None)
            .json(json!({ "email": email }));
        if let Some(redirect_to) = redirect_to {
            req = req.query("redirect_to", redirect_to);
        }
        req
    }

    fn select_request(&self, query: &Query) -> HttpRequest {
        let url = self.inner.config.rest_url(&format!("/{}", query.table_name()));
        let mut req = self.request(Method::Get, url, None);
        req.query.extend(query.params().iter().cloned());
        if query.is_single() {
            req = req.header("Accept", SINGLE_OBJECT);
        }
        req
    }

    fn insert_request(&self, table: &str, rows: Value, upsert: bool) -> HttpRequest {
        let prefer = if upsert { "resolution=merge-duplicates,return=minimal" } else { "return=minimal" };
        self.request(Method::Post, self.inner.config.rest_url(&format!("/{table}")), None)
            .header("Prefer", prefer)
            .json(rows)
    }

    fn update_request(&self, query: &Query, patch: Value) -> HttpRequest {
        let url = self.inner.config.rest_url(&format!("/{}", query.table_name()));
        let mut req = self.request(Method::Patch, url, None).header("Prefer", "return=minimal").json(patch);
        req.query.extend(query.filters());
        req
    }

    fn rpc_request(&self, function: &str, args: Value) -> HttpRequest {
        self.request(Method::Post, self.inner.config.rest_url(&format!("/rpc/{function}")), None).json(args)
    }

    fn list_request(&self, bucket: &str, prefix: &str, search: &str) -> HttpRequest {
        self.request(Method::Post, self.inner.config.storage_url(&format!("/object/list/{bucket}")), None).json(
            json!({
                "prefix": prefix,
                "search": search,
                "limit": 100,
                "offset": 0,
                "sortBy": { "column": "name", "order": "asc" },
            }),
        )
    }

    fn remove_request(&self, bucket: &str, paths: &[String]) -> HttpRequest {
        self.request(Method::Delete, self.inner.config.storage_url(&format!("/object/{bucket}")), None)
            .json(json!({ "prefixes": paths }))
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn upload_request(&self, bucket: &str, path: &str, content_type: &str, upsert: bool) -> HttpRequest {
        self.request(Method::Post, self.inner.config.storage_url(&format!("/object/{bucket}/{path}")), None)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .header("Content-Type", content_type)
    }

    /// Public URL of an object in a public bucket. No request is made.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.inner.config.storage_url(&format!("/object/public/{bucket}/{path}"))
    }

    // -------------------------------------------------------------------------
    // auth
    // -------------------------------------------------------------------------

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns the backend's message for bad credentials or unconfirmed email.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let body = self.send(self.password_grant_request(email, password)).await?;
        let session = decode::<Session>(&body)?.stamped(now_secs());
        self.store_session(Some(session.clone()));
        self.emit(AuthEvent::SignedIn);
        Ok(session)
    }

    /// Register a new account. Returns the session when the backend signs the
    /// user straight in, `None` when it sent a confirmation email instead.
    ///
    /// # Errors
    ///
    /// Returns the backend's message, e.g. for an address already registered.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        redirect_to: Option<&str>,
    ) -> Result<Option<Session>, BackendError> {
        let body = self.send(self.sign_up_request(email, password, full_name, redirect_to)).await?;
        let value: Value = decode(&body)?;
        if value.get("access_token").is_none() {
            return Ok(None);
        }
        let session = serde_json::from_value::<Session>(value)
            .map_err(|e| BackendError::Decode(e.to_string()))?
            .stamped(now_secs());
        self.store_session(Some(session.clone()));
        self.emit(AuthEvent::SignedIn);
        Ok(Some(session))
    }

    /// Revoke the session. The local session is dropped and `SignedOut`
    /// emitted even when the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns the revoke failure after local state has been cleared.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let result = if self.access_token().is_some() {
            self.send(self.sign_out_request()).await.map(|_| ())
        } else {
            Ok(())
        };
        if let Err(e) = &result {
            log::warn!("sign out request failed: {e}");
        }
        self.store_session(None);
        self.emit(AuthEvent::SignedOut);
        result
    }

    /// Change email, password or metadata of the signed-in user.
    ///
    /// # Errors
    ///
    /// [`BackendError::NotAuthenticated`] without a session, otherwise the
    /// backend's message.
    pub async fn update_user(&self, attrs: &UserAttributes) -> Result<User, BackendError> {
        if self.access_token().is_none() {
            return Err(BackendError::NotAuthenticated);
        }
        let body = self.send(self.update_user_request(attrs)).await?;
        let user: User = decode(&body)?;
        let session = self.cached_session().map(|s| Session { user: user.clone(), ..s });
        self.store_session(session);
        self.emit(AuthEvent::UserUpdated);
        Ok(user)
    }

    /// Email a password-reset link pointing at `redirect_to`.
    ///
    /// # Errors
    ///
    /// Returns the backend's message, e.g. when rate limited.
    pub async fn reset_password_for_email(&self, email: &str, redirect_to: Option<&str>) -> Result<(), BackendError> {
        self.send(self.recover_request(email, redirect_to)).await.map(|_| ())
    }

    /// Adopt tokens from a recovery link after checking them with the
    /// backend.
    ///
    /// # Errors
    ///
    /// [`BackendError::NotAuthenticated`] when the backend does not accept
    /// the access token.
    pub async fn set_session(&self, access_token: &str, refresh_token: &str) -> Result<Session, BackendError> {
        let user = self.fetch_user(access_token).await?.ok_or(BackendError::NotAuthenticated)?;
        let session = Session {
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.to_owned(),
            expires_in: ADOPTED_SESSION_SECS,
            expires_at: None,
            token_type: "bearer".to_owned(),
            user,
        }
        .stamped(now_secs());
        self.store_session(Some(session.clone()));
        self.emit(AuthEvent::SignedIn);
        Ok(session)
    }

    /// `GET /user` with `token`. Rejected tokens yield `Ok(None)`.
    async fn fetch_user(&self, token: &str) -> Result<Option<User>, BackendError> {
        match self.send(self.get_user_request(token)).await {
            Ok(body) => decode(&body).map(Some),
            Err(e) if matches!(e.status(), Some(401 | 403)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let body = self.send(self.refresh_request(refresh_token)).await?;
        let session = decode::<Session>(&body)?.stamped(now_secs());
        self.store_session(Some(session.clone()));
        self.emit(AuthEvent::TokenRefreshed);
        Ok(session)
    }

    // -------------------------------------------------------------------------
    // tables
    // -------------------------------------------------------------------------

    /// Rows matching `query`.
    ///
    /// # Errors
    ///
    /// Backend or decode failures.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, BackendError> {
        let body = self.send(self.select_request(query)).await?;
        decode(&body)
    }

    /// The one row matching `query`, or `None` when there is none.
    ///
    /// # Errors
    ///
    /// Backend or decode failures.
    pub async fn select_single<T: DeserializeOwned>(&self, query: &Query) -> Result<Option<T>, BackendError> {
        let query = query.clone().single();
        match self.send(self.select_request(&query)).await {
            Ok(body) => decode(&body).map(Some),
            Err(e) if e.status() == Some(406) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert `rows` (one object or an array). With `upsert`, rows whose
    /// primary key exists are merged instead.
    ///
    /// # Errors
    ///
    /// Backend failures, e.g. a row-level security violation.
    pub async fn insert<T: Serialize + ?Sized>(&self, table: &str, rows: &T, upsert: bool) -> Result<(), BackendError> {
        let rows = serde_json::to_value(rows).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.send(self.insert_request(table, rows, upsert)).await.map(|_| ())
    }

    /// Apply `patch` to rows matching the filters of `query`.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn update<T: Serialize + ?Sized>(&self, query: &Query, patch: &T) -> Result<(), BackendError> {
        let patch = serde_json::to_value(patch).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.send(self.update_request(query, patch)).await.map(|_| ())
    }

    /// Call a database function. An empty body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Backend or decode failures.
    pub async fn rpc(&self, function: &str, args: Value) -> Result<Value, BackendError> {
        let body = self.send(self.rpc_request(function, args)).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        decode(&body)
    }

    // -------------------------------------------------------------------------
    // storage
    // -------------------------------------------------------------------------

    /// Objects under `prefix` whose name contains `search`.
    ///
    /// # Errors
    ///
    /// [`BackendError::Storage`] on backend failures.
    pub async fn list(&self, bucket: &str, prefix: &str, search: &str) -> Result<Vec<StorageObject>, BackendError> {
        let body = self.send(self.list_request(bucket, prefix, search)).await.map_err(storage_error)?;
        decode(&body)
    }

    /// Delete objects. Missing paths are not an error.
    ///
    /// # Errors
    ///
    /// [`BackendError::Storage`] on backend failures.
    pub async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        self.send(self.remove_request(bucket, paths)).await.map(|_| ()).map_err(storage_error)
    }

    /// Upload `file` to `bucket/path`, replacing an existing object when
    /// `upsert` is set.
    ///
    /// # Errors
    ///
    /// [`BackendError::Storage`] on backend failures.
    #[cfg(feature = "hydrate")]
    pub async fn upload(&self, bucket: &str, path: &str, file: &web_sys::File, upsert: bool) -> Result<(), BackendError> {
        let req = self.upload_request(bucket, path, &file.type_(), upsert);
        transmit(&req, Some(file.clone().into())).await.map(|_| ()).map_err(storage_error)
    }
}

#[async_trait(?Send)]
impl AuthBackend for HostedClient {
    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };
        let user = self.fetch_user(&session.access_token).await?;
        if user.is_none() {
            log::info!("stored session rejected by backend");
            self.store_session(None);
        }
        Ok(user)
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(session) = self.cached_session() else {
            return Ok(None);
        };
        if !session.is_expired(now_secs()) {
            return Ok(Some(session));
        }
        match self.refresh_session(&session.refresh_token).await {
            Ok(session) => Ok(Some(session)),
            Err(e @ BackendError::Api { .. }) => {
                log::warn!("session refresh rejected: {e}");
                self.store_session(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn on_auth_state_change(&self, listener: Box<dyn Fn(AuthEvent)>) -> Subscription {
        self.inner.events.subscribe(move |event: &AuthEvent| listener(*event))
    }
}

// =============================================================================
// FETCH
// =============================================================================

/// Send `req`, using `raw` as the body instead of the JSON body when given.
#[cfg(feature = "hydrate")]
async fn transmit(req: &HttpRequest, raw: Option<wasm_bindgen::JsValue>) -> Result<String, BackendError> {
    use gloo_net::http::Request;

    let mut builder = match req.method {
        Method::Get => Request::get(&req.url),
        Method::Post => Request::post(&req.url),
        Method::Put => Request::put(&req.url),
        Method::Patch => Request::patch(&req.url),
        Method::Delete => Request::delete(&req.url),
    };
    if !req.query.is_empty() {
        builder = builder.query(req.query.iter().map(|(k, v)| (k.as_str(), v)));
    }
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }
    let request = match (raw, &req.body) {
        (Some(raw), _) => builder.body(raw),
        (None, Some(json)) => builder.json(json),
        (None, None) => builder.build(),
    }
    .map_err(|e| BackendError::Network(e.to_string()))?;

    let resp = request.send().await.map_err(|e| BackendError::Network(e.to_string()))?;
    let status = resp.status();
    let text = resp.text().await.map_err(|e| BackendError::Decode(e.to_string()))?;
    if !resp.ok() {
        log::debug!("{} {} -> {status}", req.method.as_str(), req.url);
        return Err(BackendError::from_response(status, &text));
    }
    Ok(text)
}

// =============================================================================
// PERSISTENCE
// =============================================================================

fn load_persisted_session() -> Option<Session> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window()?.local_storage().ok()??;
        let raw = storage.get_item(SESSION_STORAGE_KEY).ok()??;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

fn read_cookies() -> String {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
            .and_then(|d| d.cookie().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

fn persist_session(session: Option<&Session>) {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(Some(storage)) = window.local_storage() {
            let written = match session.map(serde_json::to_string) {
                Some(Ok(raw)) => storage.set_item(SESSION_STORAGE_KEY, &raw),
                _ => storage.remove_item(SESSION_STORAGE_KEY),
            };
            if written.is_err() {
                log::warn!("could not persist session");
            }
        }
        let cookies = match session {
            Some(s) => [
                session_cookie(ACCESS_TOKEN_COOKIE, Some(&s.access_token), s.expires_in.max(0)),
                session_cookie(REFRESH_TOKEN_COOKIE, Some(&s.refresh_token), REFRESH_COOKIE_MAX_AGE_SECS),
            ],
            None => [session_cookie(ACCESS_TOKEN_COOKIE, None, 0), session_cookie(REFRESH_TOKEN_COOKIE, None, 0)],
        };
        if let Some(doc) = window.document().and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok()) {
            for cookie in &cookies {
                let _ = doc.set_cookie(cookie);
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = session;
    }
}
