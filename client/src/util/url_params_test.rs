use super::*;

#[test]
fn parse_pairs_decodes_and_skips_prefix() {
    assert_eq!(
        parse_pairs("?message=Check+your%20inbox&empty=&flag"),
        vec![
            ("message".to_owned(), "Check your inbox".to_owned()),
            ("empty".to_owned(), String::new()),
            ("flag".to_owned(), String::new()),
        ]
    );
}

#[test]
fn percent_decode_keeps_malformed_escapes() {
    assert_eq!(percent_decode("100%"), "100%");
    assert_eq!(percent_decode("%zz"), "%zz");
    assert_eq!(percent_decode("caf%C3%A9"), "café");
}

#[test]
fn recovery_tokens_from_query() {
    let tokens = RecoveryTokens::from_url_parts("?access_token=a1&refresh_token=r1&type=recovery", "");
    assert_eq!(tokens, Some(RecoveryTokens { access_token: "a1".to_owned(), refresh_token: "r1".to_owned() }));
}

#[test]
fn recovery_tokens_from_fragment() {
    let tokens =
        RecoveryTokens::from_url_parts("", "#access_token=a2&expires_in=3600&refresh_token=r2&type=recovery");
    assert_eq!(tokens.map(|t| t.refresh_token), Some("r2".to_owned()));
}

#[test]
fn recovery_tokens_need_recovery_type_and_both_tokens() {
    assert_eq!(RecoveryTokens::from_url_parts("?access_token=a&refresh_token=r&type=signup", ""), None);
    assert_eq!(RecoveryTokens::from_url_parts("?access_token=a&type=recovery", ""), None);
    assert_eq!(RecoveryTokens::from_url_parts("", ""), None);
}

#[test]
fn update_password_href_forwards_tokens() {
    let tokens = RecoveryTokens { access_token: "a".to_owned(), refresh_token: "r".to_owned() };
    assert_eq!(tokens.update_password_href(), "/update-password?access_token=a&refresh_token=r&type=recovery");
}

#[test]
fn update_password_href_escapes_token_characters() {
    let tokens = RecoveryTokens { access_token: "a+b/c=".to_owned(), refresh_token: "r&type=x".to_owned() };
    let href = tokens.update_password_href();

    assert_eq!(href, "/update-password?access_token=a%2Bb%2Fc%3D&refresh_token=r%26type%3Dx&type=recovery");
    let (_, search) = href.split_once('?').unwrap();
    assert_eq!(RecoveryTokens::from_url_parts(search, ""), Some(tokens));
}

#[test]
fn percent_encode_keeps_unreserved_characters() {
    assert_eq!(percent_encode("aZ09-_.~"), "aZ09-_.~");
    assert_eq!(percent_encode("café 1"), "caf%C3%A9%201");
    assert_eq!(percent_decode(&percent_encode("café +%")), "café +%");
}

#[test]
fn home_notice_for_confirmed_email() {
    let notice = home_notice("?emailConfirmed=true").unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.title, "Email Confirmed");
}

#[test]
fn home_notice_for_message() {
    let notice = home_notice("?message=Password+updated").unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.message, "Password updated");
}

#[test]
fn no_notice_without_params() {
    assert_eq!(home_notice(""), None);
    assert_eq!(home_notice("?emailConfirmed=false"), None);
}
