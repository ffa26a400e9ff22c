//! HTTP middleware that mints, validates, and binds the `incorruptible`
//! session token to the request context.
//!
//! Three operations decorate a downstream handler, in increasing strictness:
//!
//! - [`set`] always succeeds: it decodes an incoming token if there is one,
//!   otherwise mints the deployment's default token and issues it via
//!   `Set-Cookie`.
//! - [`check`] requires a valid token in the cookie.
//! - [`vet`] requires a valid token in the cookie or a `Bearer i:<token>`
//!   `Authorization` header.
//!
//! Both `check` and `vet` downgrade rejections to a lenient passthrough when
//! the deployment is `http://localhost...`.

pub mod context;
pub mod cookie;
pub mod deployment;
pub mod error;
pub mod middleware;

pub use context::SessionToken;
pub use cookie::SCHEME_TAG;
pub use deployment::{Deployment, DeploymentError};
pub use error::{AuthError, EncodeFailure, MissingSessionToken, RejectReason};
pub use middleware::{check, set, vet};

use std::net::IpAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use incorruptible_token::{Cipher, DecodedToken, EncodeError};

use crate::cookie::CookieTemplate;

/// A year, in seconds, for the "expiry more than a year out is malformed"
/// middleware-level check. Distinct from the codec's own ~10-year encodable
/// window.
pub(crate) const ONE_YEAR_SECS: i64 = 365 * 24 * 3600;

pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs() as i64
}

/// The immutable, process-wide session state: the cipher, cookie template,
/// magic byte, default token, and the configured expiry/IP-binding policy.
/// Share it across request workers behind an `Arc` — nothing here needs
/// interior mutability.
pub struct SessionContext {
    pub(crate) cipher: Cipher,
    pub(crate) magic: u8,
    cookie: CookieTemplate,
    deployment: Deployment,
    default_token: DecodedToken,
    default_scheme_value: String,
    token_max_age: Duration,
    bind_ip: bool,
}

impl SessionContext {
    /// Builds a session context. `key` is the 128-bit AEAD key; `magic` is
    /// this deployment's constant frame-identity byte; `token_max_age` is
    /// both the cookie's `Max-Age` and the expiry stamped onto tokens minted
    /// via [`SessionContext::issue`]; `bind_ip` controls whether
    /// [`SessionContext::issue`] binds the caller's address into the token.
    pub fn new(
        key: [u8; 16],
        magic: u8,
        deployment: Deployment,
        token_max_age: Duration,
        bind_ip: bool,
    ) -> Self {
        let cipher = Cipher::new(key);
        let default_token = DecodedToken::new();
        let default_encoded = incorruptible_token::seal(&cipher, magic, &default_token)
            .expect("the default token (no expiry, no ip, no values) always encodes");
        let default_scheme_value = format!("{SCHEME_TAG}{default_encoded}");
        let cookie = CookieTemplate::from_deployment(&deployment, token_max_age);

        Self {
            cipher,
            magic,
            cookie,
            deployment,
            default_token,
            default_scheme_value,
            token_max_age,
            bind_ip,
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn cookie(&self) -> &CookieTemplate {
        &self.cookie
    }

    pub fn default_token(&self) -> &DecodedToken {
        &self.default_token
    }

    /// Whether minted tokens should be bound to the caller's address.
    pub fn binds_ip(&self) -> bool {
        self.bind_ip
    }

    /// Mints a fresh `Set-Cookie` header value for `token`: stamps the
    /// configured expiry if the caller left it at `0`, binds `remote_ip` if
    /// this deployment binds IPs, then seals and encodes it. This is the
    /// entry point application code uses to log a session in (attach real
    /// values) — Set/Check/Vet themselves only ever mint the *default*,
    /// value-less token.
    pub fn issue(
        &self,
        mut token: DecodedToken,
        remote_ip: Option<IpAddr>,
    ) -> Result<(axum::http::HeaderValue, DecodedToken), EncodeError> {
        if token.expiry == 0 {
            token.expiry = now_unix() + self.token_max_age.as_secs() as i64;
        }
        if self.bind_ip {
            if let Some(ip) = remote_ip {
                token.bind_ip(ip);
            }
        }
        let encoded = incorruptible_token::seal(&self.cipher, self.magic, &token)?;
        let scheme_value = format!("{SCHEME_TAG}{encoded}");
        let header = self.cookie.set_cookie_header(&scheme_value);
        Ok((header, token))
    }

    pub(crate) fn default_scheme_value(&self) -> &str {
        &self.default_scheme_value
    }
}
