//! Parameters carried in page URLs: recovery-link tokens and the
//! notifications shown on the home page after an email link.

#[cfg(test)]
#[path = "url_params_test.rs"]
mod url_params_test;

/// Split `a=1&b=2` into decoded pairs. A leading `?` or `#` is ignored.
pub fn parse_pairs(raw: &str) -> Vec<(String, String)> {
    raw.trim_start_matches(['?', '#'])
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str()).filter(|v| !v.is_empty())
}

/// Decode `%XX` escapes and `+`. Malformed escapes are kept literally.
pub fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = hex {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Escape everything outside the RFC 3986 unreserved set, so
/// `percent_decode(&percent_encode(s)) == s`.
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Tokens from a password-recovery link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveryTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl RecoveryTokens {
    /// Read tokens from the query string, falling back to the fragment. Both
    /// tokens and `type=recovery` must be present.
    pub fn from_url_parts(search: &str, hash: &str) -> Option<Self> {
        [search, hash].into_iter().find_map(|part| {
            let pairs = parse_pairs(part);
            if lookup(&pairs, "type") != Some("recovery") {
                return None;
            }
            Some(Self {
                access_token: lookup(&pairs, "access_token")?.to_owned(),
                refresh_token: lookup(&pairs, "refresh_token")?.to_owned(),
            })
        })
    }

    /// `/update-password` link carrying the tokens in its query string.
    pub fn update_password_href(&self) -> String {
        format!(
            "/update-password?access_token={}&refresh_token={}&type=recovery",
            percent_encode(&self.access_token),
            percent_encode(&self.refresh_token)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "notification--success",
            Self::Error => "notification--error",
            Self::Info => "notification--info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// Home-page notice for `?emailConfirmed=true` or `?message=<text>`.
pub fn home_notice(search: &str) -> Option<Notice> {
    let pairs = parse_pairs(search);
    if lookup(&pairs, "emailConfirmed") == Some("true") {
        return Some(Notice {
            kind: NoticeKind::Success,
            title: "Email Confirmed".to_owned(),
            message: "Your email address has been successfully confirmed!".to_owned(),
        });
    }
    lookup(&pairs, "message").map(|text| Notice {
        kind: NoticeKind::Info,
        title: "Email Confirmation".to_owned(),
        message: text.to_owned(),
    })
}

/// `location.search` and `location.hash` of the current page.
pub fn current_location() -> (String, String) {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .map(|w| w.location())
            .map(|l| (l.search().unwrap_or_default(), l.hash().unwrap_or_default()))
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        (String::new(), String::new())
    }
}

/// Drop the query string from the address bar without navigating, so a
/// one-off notice is not shown again on reload.
pub fn strip_query() {
    #[cfg(feature = "hydrate")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let path = window.location().pathname().unwrap_or_else(|_| "/".to_owned());
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
        }
    }
}

/// `location.origin`, used to build links the backend emails out.
pub fn current_origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok()).unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}
