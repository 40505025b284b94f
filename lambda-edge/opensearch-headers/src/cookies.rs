use crate::{CloudFrontResponse, HeaderEntry, Headers};

pub const SET_COOKIE: &str = "set-cookie";

/// Cookies carrying any of these are Cognito tokens and must not reach the browser
pub const SENSITIVE_TOKEN_MARKERS: [&str; 3] = ["ID-TOKEN", "REFRESH-TOKEN", "ACCESS-TOKEN"];

pub const SAME_SITE_STRICT: &str = "; SameSite=Strict";

/// How many `set-cookie` values were kept and how many were removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieFilterReport {
    pub retained: usize,
    pub dropped: usize,
}

/// Case-sensitive substring match against the token markers
pub fn is_sensitive_cookie(value: &str) -> bool {
    SENSITIVE_TOKEN_MARKERS
        .iter()
        .any(|marker| value.contains(marker))
}

/// Drop token cookies and mark the rest `SameSite=Strict`.
///
/// Returns `None` and leaves `headers` alone when there is no `set-cookie`
/// header. Otherwise the header is replaced with the surviving cookies in
/// their original order. Applying this twice appends the suffix twice.
pub fn filter_set_cookies(headers: &mut Headers) -> Option<CookieFilterReport> {
    let cookies = headers.get(SET_COOKIE)?;

    let filtered: Vec<HeaderEntry> = cookies
        .iter()
        .filter(|cookie| !is_sensitive_cookie(&cookie.value))
        .map(|cookie| HeaderEntry::new(SET_COOKIE, format!("{}{}", cookie.value, SAME_SITE_STRICT)))
        .collect();

    let report = CookieFilterReport {
        retained: filtered.len(),
        dropped: cookies.len() - filtered.len(),
    };

    headers.insert(SET_COOKIE.to_string(), filtered);
    Some(report)
}

impl CloudFrontResponse {
    /// Response without a header map is passed through as is
    pub fn filter_cookies(&mut self) -> Option<CookieFilterReport> {
        self.headers.as_mut().and_then(filter_set_cookies)
    }
}
