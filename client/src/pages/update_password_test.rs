use super::*;
use crate::net::types::{User, UserMetadata};
use crate::state::auth::AuthState;

fn settled(user: Option<User>) -> AuthSnapshot {
    let state = user.map_or_else(AuthState::default, |u| AuthState::signed_in(u, None));
    AuthSnapshot { state, loading: false }
}

#[test]
fn anonymous_visitor_without_tokens_must_log_in() {
    assert!(needs_login(&settled(None), false));
}

#[test]
fn recovery_tokens_keep_the_visitor_here() {
    assert!(!needs_login(&settled(None), true));
}

#[test]
fn signed_in_user_or_pending_auth_stays() {
    let user = User { id: "u1".to_owned(), email: None, user_metadata: UserMetadata::default() };
    assert!(!needs_login(&settled(Some(user)), false));
    assert!(!needs_login(&AuthSnapshot::default(), false));
}
