//! Cookie policy and the hand-rolled `Set-Cookie`/`Cookie` header handling.
//!
//! No cookie-jar crate sits here on purpose: the cookie format this
//! middleware needs is small enough to build and parse directly off
//! `axum::http::HeaderMap`.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};

use crate::deployment::Deployment;

/// The scheme tag prepended to every token value, per RFC 8959's convention
/// for secret URI schemes.
pub const SCHEME_TAG: &str = "i:";

/// The fixed cookie attributes derived once from a [`Deployment`] at
/// session-context construction time.
#[derive(Debug, Clone)]
pub struct CookieTemplate {
    name: String,
    domain: String,
    path: String,
    secure: bool,
    max_age: Duration,
}

impl CookieTemplate {
    pub fn from_deployment(deployment: &Deployment, max_age: Duration) -> Self {
        Self {
            name: deployment.cookie_name(),
            domain: deployment.cookie_domain().to_string(),
            path: deployment.cookie_path().to_string(),
            secure: deployment.is_secure(),
            max_age,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds a `Set-Cookie` header value carrying `scheme_value` (already
    /// prefixed with [`SCHEME_TAG`]). `HttpOnly` and `SameSite=Strict` are
    /// always present; `Secure` only when the deployment is HTTPS.
    pub fn set_cookie_header(&self, scheme_value: &str) -> HeaderValue {
        self.set_cookie_header_with_max_age(scheme_value, self.max_age)
    }

    pub fn set_cookie_header_with_max_age(&self, scheme_value: &str, max_age: Duration) -> HeaderValue {
        let mut value = format!(
            "{}={}; Domain={}; Path={}; Max-Age={}; HttpOnly; SameSite=Strict",
            self.name,
            scheme_value,
            self.domain,
            self.path,
            max_age.as_secs(),
        );
        if self.secure {
            value.push_str("; Secure");
        }
        HeaderValue::from_str(&value).expect("cookie attributes never contain header-hostile bytes")
    }

    /// Scans the request's `Cookie` header(s) for this template's name and
    /// returns the raw value (still carrying the `i:` scheme tag).
    pub fn extract_value<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        let prefix_len = self.name.len() + 1;
        headers
            .get_all(axum::http::header::COOKIE)
            .iter()
            .filter_map(|raw| raw.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .map(str::trim)
            .find(|pair| pair.starts_with(&self.name) && pair.as_bytes().get(self.name.len()) == Some(&b'='))
            .map(|pair| &pair[prefix_len..])
    }
}

/// Extracts `i:<token>` from the first `Authorization: Bearer i:<token>`
/// header, matching the scheme prefix verbatim.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let rest = value.strip_prefix("Bearer ")?;
    if rest.starts_with(SCHEME_TAG) {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::Deployment;

    fn template() -> CookieTemplate {
        let deployment = Deployment::new("https://example.com/app/session", "doc").unwrap();
        CookieTemplate::from_deployment(&deployment, Duration::from_secs(3600))
    }

    #[test]
    fn builds_expected_header() {
        let header = template().set_cookie_header("i:abc123");
        let s = header.to_str().unwrap();
        assert!(s.starts_with("session=i:abc123;"));
        assert!(s.contains("Domain=example.com"));
        assert!(s.contains("Path=/app/session"));
        assert!(s.contains("Max-Age=3600"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Strict"));
        assert!(s.contains("Secure"));
    }

    #[test]
    fn extracts_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("other=1; session=i:xyz; third=2"),
        );
        assert_eq!(template().extract_value(&headers), Some("i:xyz"));
    }

    #[test]
    fn missing_cookie_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(template().extract_value(&headers), None);
    }

    #[test]
    fn bearer_requires_scheme_tag() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer i:abcdef"),
        );
        assert_eq!(extract_bearer(&headers), Some("i:abcdef"));

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abcdef"),
        );
        assert_eq!(extract_bearer(&headers), None);
    }
}
