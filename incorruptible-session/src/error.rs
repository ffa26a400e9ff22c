//! Rejection reasons and the JSON error response shape.
//!
//! Hand-rolled enums with manual `Display`/`Error` impls rather than
//! reaching for `thiserror`.

use std::error::Error;
use std::fmt;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use incorruptible_token::TokenError;

/// Why a request's token was rejected. Distinguishes "nothing was there" from
/// "something was there and it didn't check out", and Vet's composite case
/// where both the cookie and the bearer header were tried and both failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoTokenPresent,
    Token(TokenError),
    Composite {
        cookie: Box<RejectReason>,
        header: Box<RejectReason>,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoTokenPresent => write!(f, "no session token present"),
            RejectReason::Token(inner) => write!(f, "{inner}"),
            RejectReason::Composite { cookie, header } => {
                write!(f, "cookie: {cookie}; header: {header}")
            }
        }
    }
}

impl Error for RejectReason {}

/// The short, human-readable reason surfaced to the client. Never the full
/// internal [`RejectReason`] — that's logged via `tracing`, not returned.
fn public_reason(reason: &RejectReason) -> &'static str {
    match reason {
        RejectReason::NoTokenPresent => "no session token present",
        RejectReason::Token(TokenError::Malformed(_)) => "malformed session token",
        RejectReason::Token(TokenError::IntegrityFailure) => "session token failed integrity check",
        RejectReason::Token(TokenError::MagicMismatch) => "session token is not valid for this deployment",
        RejectReason::Token(TokenError::Expired) => "session token has expired",
        RejectReason::Token(TokenError::ExpiryOutOfRange) => "session token expiry is out of range",
        RejectReason::Token(TokenError::IpMismatch) => "session token is bound to a different address",
        RejectReason::Composite { .. } => "no valid session token found in cookie or Authorization header",
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    query: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    doc: String,
}

/// The 401 rejection Check/Vet return in production mode.
#[derive(Debug, Clone)]
pub struct AuthError {
    pub reason: RejectReason,
    pub path: String,
    pub query: String,
    pub doc: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: public_reason(&self.reason).to_string(),
            path: self.path,
            query: self.query,
            doc: self.doc,
        };
        (
            StatusCode::UNAUTHORIZED,
            [(header::X_CONTENT_TYPE_OPTIONS, "nosniff")],
            Json(body),
        )
            .into_response()
    }
}

/// Surfaced by the [`crate::context::SessionToken`] extractor when no
/// Set/Check/Vet middleware ran for this route: a programmer error, not a
/// client-facing rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingSessionToken;

impl fmt::Display for MissingSessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no session token attached to this request's context")
    }
}

impl Error for MissingSessionToken {}

impl IntoResponse for MissingSessionToken {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "no session token attached to this request's context; \
             did the Set/Check/Vet middleware run for this route?",
        )
            .into_response()
    }
}

/// Wraps an [`incorruptible_token::EncodeError`] for routes that mint a
/// fresh token and want an `IntoResponse` without an orphan-rule violation.
/// Encode errors reaching here are programmer errors (too many values, a
/// value over 255 bytes, an expiry outside the encodable window) and are
/// treated as a 500, never a 401.
#[derive(Debug, Clone, Copy)]
pub struct EncodeFailure(pub incorruptible_token::EncodeError);

impl fmt::Display for EncodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for EncodeFailure {}

impl IntoResponse for EncodeFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_reason_mentions_both_sources() {
        let reason = RejectReason::Composite {
            cookie: Box::new(RejectReason::Token(TokenError::IntegrityFailure)),
            header: Box::new(RejectReason::NoTokenPresent),
        };
        let rendered = reason.to_string();
        assert!(rendered.contains("cookie:"));
        assert!(rendered.contains("header:"));
    }

    #[test]
    fn public_reason_never_echoes_malformed_detail() {
        let reason = RejectReason::Token(TokenError::Malformed("internal only"));
        assert_eq!(public_reason(&reason), "malformed session token");
    }
}
