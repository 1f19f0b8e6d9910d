use std::cell::Cell;
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::executor::block_on;

use super::*;
use crate::net::types::UserMetadata;

/// Hands out canned responses in order and records what was sent.
#[derive(Default)]
struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<String, BackendError>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn with(responses: Vec<Result<String, BackendError>>) -> Rc<Self> {
        Rc::new(Self { responses: RefCell::new(responses.into()), sent: RefCell::new(Vec::new()) })
    }

    fn urls(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|req| req.url.clone()).collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, req: HttpRequest) -> Result<String, BackendError> {
        self.sent.borrow_mut().push(req);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Network("no scripted response".to_owned())))
    }
}

fn config() -> BackendConfig {
    BackendConfig::from_parts(Some("https://demo.backend.test/"), Some("anon-key")).unwrap()
}

fn session(token: &str) -> Session {
    Session {
        access_token: token.to_owned(),
        refresh_token: "refresh-1".to_owned(),
        expires_in: 3600,
        expires_at: Some(i64::MAX / 2),
        token_type: "bearer".to_owned(),
        user: User { id: "u-1".to_owned(), email: None, user_metadata: UserMetadata::default() },
    }
}

fn signed_in_client() -> HostedClient {
    let client = HostedClient::new(config());
    client.store_session(Some(session("access-1")));
    client
}

fn expired_session() -> Session {
    Session { expires_at: Some(0), ..session("access-1") }
}

/// Client over `transport` holding `session`, plus a log of emitted events.
fn scripted_client(
    transport: &Rc<ScriptedTransport>,
    session: Session,
) -> (HostedClient, Rc<RefCell<Vec<AuthEvent>>>) {
    let transport: Rc<dyn Transport> = transport.clone();
    let client = HostedClient::with_transport(config(), transport);
    client.store_session(Some(session));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _sub = client.on_auth_state_change(Box::new(move |event| sink.borrow_mut().push(event)));
    (client, events)
}

fn refreshed_body() -> String {
    json!({
        "access_token": "access-2",
        "refresh_token": "refresh-2",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": { "id": "u-1", "email": "ada@example.com" },
    })
    .to_string()
}

fn query_pairs(req: &HttpRequest) -> Vec<(&str, &str)> {
    req.query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

// =============================================================================
// auth requests
// =============================================================================

#[test]
fn password_grant_posts_credentials() {
    let req = HostedClient::new(config()).password_grant_request("ada@example.com", "secret");

    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "https://demo.backend.test/auth/v1/token");
    assert_eq!(query_pairs(&req), vec![("grant_type", "password")]);
    assert_eq!(req.header_value("apikey"), Some("anon-key"));
    assert_eq!(req.body, Some(json!({ "email": "ada@example.com", "password": "secret" })));
}

#[test]
fn refresh_uses_refresh_token_grant() {
    let req = HostedClient::new(config()).refresh_request("r-1");

    assert_eq!(query_pairs(&req), vec![("grant_type", "refresh_token")]);
    assert_eq!(req.body, Some(json!({ "refresh_token": "r-1" })));
}

#[test]
fn sign_up_sends_full_name_metadata_and_redirect() {
    let req = HostedClient::new(config()).sign_up_request(
        "ada@example.com",
        "secret",
        "Ada Lovelace",
        Some("https://app.test/?emailConfirmed=true"),
    );

    assert_eq!(req.url, "https://demo.backend.test/auth/v1/signup");
    assert_eq!(query_pairs(&req), vec![("redirect_to", "https://app.test/?emailConfirmed=true")]);
    assert_eq!(req.body.as_ref().and_then(|b| b.pointer("/data/full_name")), Some(&json!("Ada Lovelace")));
}

#[test]
fn requests_fall_back_to_anon_key_bearer() {
    let req = HostedClient::new(config()).recover_request("ada@example.com", None);

    assert_eq!(req.header_value("authorization"), Some("Bearer anon-key"));
    assert!(req.query.is_empty());
}

#[test]
fn requests_use_session_token_when_signed_in() {
    let req = signed_in_client().sign_out_request();

    assert_eq!(req.url, "https://demo.backend.test/auth/v1/logout");
    assert_eq!(req.header_value("Authorization"), Some("Bearer access-1"));
}

#[test]
fn get_user_request_uses_explicit_token() {
    let req = signed_in_client().get_user_request("recovery-token");

    assert_eq!(req.method, Method::Get);
    assert_eq!(req.header_value("Authorization"), Some("Bearer recovery-token"));
}

#[test]
fn update_user_serializes_only_given_fields() {
    let attrs = UserAttributes { password: Some("new-secret".to_owned()), ..UserAttributes::default() };
    let req = signed_in_client().update_user_request(&attrs);

    assert_eq!(req.method, Method::Put);
    assert_eq!(req.body, Some(json!({ "password": "new-secret" })));
}

// =============================================================================
// table requests
// =============================================================================

#[test]
fn select_request_carries_query_pairs() {
    let query = Query::table("courses").select("*").order("name", true);
    let req = signed_in_client().select_request(&query);

    assert_eq!(req.url, "https://demo.backend.test/rest/v1/courses");
    assert_eq!(query_pairs(&req), vec![("select", "*"), ("order", "name.asc")]);
    assert_eq!(req.header_value("Accept"), None);
}

#[test]
fn single_select_asks_for_object() {
    let query = Query::table("courses").select("*").eq("slug", "rust").single();
    let req = signed_in_client().select_request(&query);

    assert_eq!(req.header_value("Accept"), Some(SINGLE_OBJECT));
}

#[test]
fn insert_prefers_merge_on_upsert() {
    let client = signed_in_client();

    let upsert = client.insert_request("stage_completions", json!({ "user_id": "u-1" }), true);
    assert_eq!(upsert.header_value("Prefer"), Some("resolution=merge-duplicates,return=minimal"));

    let plain = client.insert_request("quiz_attempts", json!([]), false);
    assert_eq!(plain.header_value("Prefer"), Some("return=minimal"));
    assert_eq!(plain.url, "https://demo.backend.test/rest/v1/quiz_attempts");
}

#[test]
fn update_request_patches_filtered_rows() {
    let query = Query::table("profiles").select("*").eq("id", "u-1");
    let req = signed_in_client().update_request(&query, json!({ "full_name": "Ada" }));

    assert_eq!(req.method, Method::Patch);
    assert_eq!(query_pairs(&req), vec![("id", "eq.u-1")]);
}

#[test]
fn rpc_request_targets_function_path() {
    let req = signed_in_client().rpc_request("get_user_stats", json!({ "user_uuid": "u-1" }));

    assert_eq!(req.url, "https://demo.backend.test/rest/v1/rpc/get_user_stats");
    assert_eq!(req.body, Some(json!({ "user_uuid": "u-1" })));
}

// =============================================================================
// storage requests
// =============================================================================

#[test]
fn storage_requests_target_bucket_paths() {
    let client = signed_in_client();

    let list = client.list_request("avatars", "", "u-1.png");
    assert_eq!(list.url, "https://demo.backend.test/storage/v1/object/list/avatars");
    assert_eq!(list.body.as_ref().and_then(|b| b.get("search")), Some(&json!("u-1.png")));

    let remove = client.remove_request("avatars", &["u-1.png".to_owned()]);
    assert_eq!(remove.method, Method::Delete);
    assert_eq!(remove.body, Some(json!({ "prefixes": ["u-1.png"] })));

    let upload = client.upload_request("avatars", "u-1.png", "image/png", true);
    assert_eq!(upload.url, "https://demo.backend.test/storage/v1/object/avatars/u-1.png");
    assert_eq!(upload.header_value("x-upsert"), Some("true"));
    assert_eq!(upload.header_value("content-type"), Some("image/png"));
}

#[test]
fn public_url_needs_no_request() {
    assert_eq!(
        HostedClient::new(config()).public_url("avatars", "u-1.jpg"),
        "https://demo.backend.test/storage/v1/object/public/avatars/u-1.jpg"
    );
}

#[test]
fn storage_error_retags_api_failures_only() {
    assert_eq!(
        storage_error(BackendError::from_response(400, r#"{"message":"Bucket not found"}"#)),
        BackendError::Storage("Bucket not found".to_owned())
    );
    assert_eq!(
        storage_error(BackendError::Network("offline".to_owned())),
        BackendError::Network("offline".to_owned())
    );
}

#[test]
fn session_cookie_sets_and_clears() {
    assert_eq!(
        session_cookie(ACCESS_TOKEN_COOKIE, Some("tok"), 3600),
        "mls-access-token=tok; Path=/; Max-Age=3600; SameSite=Lax"
    );
    assert_eq!(
        session_cookie(REFRESH_TOKEN_COOKIE, None, 3600),
        "mls-refresh-token=; Path=/; Max-Age=0; SameSite=Lax"
    );
}

#[test]
fn cookie_value_finds_named_non_empty_cookie() {
    let cookies = "theme=dark; mls-access-token=at-9; mls-refresh-token=";
    assert_eq!(cookie_value(cookies, ACCESS_TOKEN_COOKIE), Some("at-9"));
    assert_eq!(cookie_value(cookies, REFRESH_TOKEN_COOKIE), None);
    assert_eq!(cookie_value(cookies, "missing"), None);
}

#[test]
fn server_renewed_cookies_replace_stored_tokens() {
    let cookies = "mls-access-token=at-new; mls-refresh-token=rt-new";
    let session = reconcile_with_cookies(Some(expired_session()), cookies, 1_000).unwrap();

    assert_eq!(session.access_token, "at-new");
    assert_eq!(session.refresh_token, "rt-new");
    assert_eq!(session.expires_at, Some(1_000 + ADOPTED_SESSION_SECS));
    assert_eq!(session.user.id, "u-1");
}

#[test]
fn matching_or_missing_cookies_keep_stored_session() {
    let stored = session("access-1");
    let same = format!("mls-access-token=other; mls-refresh-token={}", stored.refresh_token);

    assert_eq!(reconcile_with_cookies(Some(stored.clone()), &same, 1_000), Some(stored.clone()));
    assert_eq!(reconcile_with_cookies(Some(stored.clone()), "", 1_000), Some(stored));
    assert_eq!(reconcile_with_cookies(None, "mls-access-token=a; mls-refresh-token=r", 1_000), None);
}

// =============================================================================
// session behaviour without a network
// =============================================================================

#[test]
fn get_user_without_session_is_none() {
    let client = HostedClient::new(config());
    assert_eq!(block_on(client.get_user()), Ok(None));
    assert_eq!(block_on(client.get_session()), Ok(None));
}

#[test]
fn unexpired_session_is_returned_from_cache() {
    let client = signed_in_client();
    let cached = block_on(client.get_session()).unwrap();
    assert_eq!(cached.map(|s| s.access_token), Some("access-1".to_owned()));
}

#[test]
fn network_failure_is_surfaced_from_get_user() {
    let client = signed_in_client();
    assert!(matches!(block_on(client.get_user()), Err(BackendError::Unavailable(_))));
}

#[test]
fn sign_out_clears_session_and_emits_even_when_request_fails() {
    let transport = ScriptedTransport::with(vec![Err(BackendError::from_response(500, r#"{"msg":"boom"}"#))]);
    let (client, events) = scripted_client(&transport, session("access-1"));

    let result = block_on(client.sign_out());

    assert_eq!(result.map_err(|e| e.status()), Err(Some(500)));
    assert_eq!(client.cached_session(), None);
    assert_eq!(*events.borrow(), vec![AuthEvent::SignedOut]);
    assert_eq!(transport.urls(), vec!["https://demo.backend.test/auth/v1/logout"]);
}

#[test]
fn sign_out_without_session_skips_revoke_call() {
    let transport = ScriptedTransport::with(Vec::new());
    let client = HostedClient::with_transport(config(), transport.clone());

    assert_eq!(block_on(client.sign_out()), Ok(()));
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn get_user_clears_session_the_backend_rejects() {
    let transport = ScriptedTransport::with(vec![Err(BackendError::from_response(401, r#"{"msg":"invalid JWT"}"#))]);
    let (client, events) = scripted_client(&transport, session("access-1"));

    assert_eq!(block_on(client.get_user()), Ok(None));
    assert_eq!(client.cached_session(), None);
    assert!(events.borrow().is_empty());
}

#[test]
fn get_user_returns_user_for_accepted_session() {
    let body = json!({ "id": "u-1", "email": "ada@example.com" }).to_string();
    let transport = ScriptedTransport::with(vec![Ok(body)]);
    let (client, _events) = scripted_client(&transport, session("access-1"));

    let user = block_on(client.get_user()).unwrap();

    assert_eq!(user.and_then(|u| u.email), Some("ada@example.com".to_owned()));
    assert_eq!(transport.sent.borrow()[0].header_value("Authorization"), Some("Bearer access-1"));
    assert!(client.cached_session().is_some());
}

#[test]
fn expired_session_is_refreshed_and_announced() {
    let transport = ScriptedTransport::with(vec![Ok(refreshed_body())]);
    let (client, events) = scripted_client(&transport, expired_session());

    let refreshed = block_on(client.get_session()).unwrap();

    assert_eq!(refreshed.map(|s| s.access_token), Some("access-2".to_owned()));
    assert_eq!(client.cached_session().map(|s| s.refresh_token), Some("refresh-2".to_owned()));
    assert_eq!(*events.borrow(), vec![AuthEvent::TokenRefreshed]);
    let sent = transport.sent.borrow();
    assert_eq!(sent[0].body, Some(json!({ "refresh_token": "refresh-1" })));
}

#[test]
fn rejected_refresh_clears_session() {
    let rejected = BackendError::from_response(400, r#"{"error_description":"Invalid Refresh Token"}"#);
    let transport = ScriptedTransport::with(vec![Err(rejected)]);
    let (client, events) = scripted_client(&transport, expired_session());

    assert_eq!(block_on(client.get_session()), Ok(None));
    assert_eq!(client.cached_session(), None);
    assert!(events.borrow().is_empty());
}

#[test]
fn refresh_network_failure_keeps_session() {
    let transport = ScriptedTransport::with(vec![Err(BackendError::Network("offline".to_owned()))]);
    let (client, _events) = scripted_client(&transport, expired_session());

    assert_eq!(block_on(client.get_session()), Err(BackendError::Network("offline".to_owned())));
    assert_eq!(client.cached_session().map(|s| s.access_token), Some("access-1".to_owned()));
}

#[test]
fn get_user_refreshes_before_asking_for_user() {
    let user = json!({ "id": "u-1" }).to_string();
    let transport = ScriptedTransport::with(vec![Ok(refreshed_body()), Ok(user)]);
    let (client, _events) = scripted_client(&transport, expired_session());

    assert!(block_on(client.get_user()).unwrap().is_some());
    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].header_value("Authorization"), Some("Bearer access-2"));
}

#[test]
fn update_user_requires_session() {
    let client = HostedClient::new(config());
    assert_eq!(block_on(client.update_user(&UserAttributes::default())), Err(BackendError::NotAuthenticated));
}

#[test]
fn unsubscribed_listener_hears_nothing() {
    let client = signed_in_client();
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    let sub = client.on_auth_state_change(Box::new(move |_| seen.set(seen.get() + 1)));

    sub.unsubscribe();
    let _ = block_on(client.sign_out());

    assert_eq!(hits.get(), 0);
}
