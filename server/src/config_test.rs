use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

const BACKEND: [(&str, &str); 2] = [("MLS_BACKEND_URL", "https://demo.backend.test/"), ("MLS_BACKEND_ANON_KEY", "anon")];

#[test]
fn defaults_port_to_3000() {
    let settings = Settings::from_lookup(lookup(&BACKEND)).unwrap();
    assert_eq!(settings.port, DEFAULT_PORT);
    assert_eq!(settings.backend.url, "https://demo.backend.test");
    assert_eq!(settings.backend.anon_key, "anon");
}

#[test]
fn reads_port_override() {
    let mut pairs = BACKEND.to_vec();
    pairs.push(("PORT", " 8080 "));
    assert_eq!(Settings::from_lookup(lookup(&pairs)).unwrap().port, 8080);
}

#[test]
fn blank_port_uses_default() {
    let mut pairs = BACKEND.to_vec();
    pairs.push(("PORT", ""));
    assert_eq!(Settings::from_lookup(lookup(&pairs)).unwrap().port, DEFAULT_PORT);
}

#[test]
fn rejects_bad_port() {
    for raw in ["abc", "0", "70000"] {
        let mut pairs = BACKEND.to_vec();
        pairs.push(("PORT", raw));
        assert!(
            matches!(Settings::from_lookup(lookup(&pairs)), Err(SettingsError::InvalidPort(_))),
            "expected {raw:?} to be rejected"
        );
    }
}

#[test]
fn missing_backend_url_is_reported() {
    let err = Settings::from_lookup(lookup(&[("MLS_BACKEND_ANON_KEY", "anon")])).unwrap_err();
    assert_eq!(err.to_string(), "MLS_BACKEND_URL is not set");
}

#[test]
fn non_http_backend_url_is_rejected() {
    let err = Settings::from_lookup(lookup(&[("MLS_BACKEND_URL", "ftp://x"), ("MLS_BACKEND_ANON_KEY", "anon")])).unwrap_err();
    assert!(matches!(err, SettingsError::Backend(ConfigError::InvalidUrl { .. })));
}
