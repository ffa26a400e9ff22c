//! Set, Check, and Vet: the three middleware entry points.
//!
//! Each is an `axum::middleware::from_fn_with_state` function: look at the
//! request, decide, then either call `next.run(req)` or short-circuit with
//! a JSON error, logging at the rejection boundary via `tracing::warn!`.

use std::net::IpAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use incorruptible_token::TokenError;

use crate::context::attach;
use crate::cookie::{extract_bearer, SCHEME_TAG};
use crate::error::{AuthError, RejectReason};
use crate::{now_unix, SessionContext, ONE_YEAR_SECS};

fn remote_ip(req: &Request) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip())
}

fn decode_scheme_value(ctx: &SessionContext, value: &str) -> Result<incorruptible_token::DecodedToken, TokenError> {
    if value == ctx.default_scheme_value() {
        // The literal-equality fast path: skip the decrypt for the one
        // value we already know the plaintext of.
        return Ok(ctx.default_token().clone());
    }
    let printable = value
        .strip_prefix(SCHEME_TAG)
        .ok_or(TokenError::Malformed("missing scheme tag"))?;
    incorruptible_token::open(&ctx.cipher, ctx.magic, printable)
}

fn decode_cookie(
    ctx: &SessionContext,
    headers: &HeaderMap,
) -> Result<incorruptible_token::DecodedToken, RejectReason> {
    let raw = ctx.cookie().extract_value(headers).ok_or(RejectReason::NoTokenPresent)?;
    decode_scheme_value(ctx, raw).map_err(RejectReason::Token)
}

fn decode_bearer(
    ctx: &SessionContext,
    headers: &HeaderMap,
) -> Result<incorruptible_token::DecodedToken, RejectReason> {
    let raw = extract_bearer(headers).ok_or(RejectReason::NoTokenPresent)?;
    decode_scheme_value(ctx, raw).map_err(RejectReason::Token)
}

/// Checks that expiry is in the future and within a year, and that a bound
/// IP matches. The magic-byte check already happened inside
/// `decode_scheme_value`/`open`.
fn validate_strict(
    token: &incorruptible_token::DecodedToken,
    now: i64,
    remote_ip: Option<IpAddr>,
) -> Result<(), TokenError> {
    incorruptible_token::validate(token, now, remote_ip)?;
    if token.expiry != 0 && token.expiry > now + ONE_YEAR_SECS {
        return Err(TokenError::ExpiryOutOfRange);
    }
    Ok(())
}

fn decode_and_validate(
    decoded: Result<incorruptible_token::DecodedToken, RejectReason>,
    now: i64,
    remote_ip: Option<IpAddr>,
) -> Result<incorruptible_token::DecodedToken, RejectReason> {
    let token = decoded?;
    validate_strict(&token, now, remote_ip).map_err(RejectReason::Token)?;
    Ok(token)
}

fn auth_error(ctx: &SessionContext, reason: RejectReason, req: &Request) -> AuthError {
    AuthError {
        reason,
        path: req.uri().path().to_string(),
        query: req.uri().query().unwrap_or("").to_string(),
        doc: ctx.deployment().doc_url().to_string(),
    }
}

/// Shared REJECT/LENIENT branch: in production, a 401 with the JSON body;
/// in development (localhost), call `next` without attaching a token.
async fn reject_or_lenient(
    ctx: &SessionContext,
    reason: RejectReason,
    req: Request,
    next: Next,
) -> Response {
    tracing::warn!(
        path = %req.uri().path(),
        reason = %reason,
        "session token rejected"
    );
    if ctx.deployment().is_localhost() {
        next.run(req).await
    } else {
        auth_error(ctx, reason, &req).into_response()
    }
}

/// **Set.** Never fails the request: decodes an incoming token if there is
/// one and attaches it, otherwise mints the default token, issues it via
/// `Set-Cookie`, and attaches the default.
pub async fn set(State(ctx): State<Arc<SessionContext>>, mut req: Request, next: Next) -> Response {
    let decoded = decode_cookie(&ctx, req.headers()).ok();
    match decoded {
        Some(token) => {
            attach(&mut req, token);
            next.run(req).await
        }
        None => {
            attach(&mut req, ctx.default_token().clone());
            let mut response = next.run(req).await;
            response.headers_mut().append(
                axum::http::header::SET_COOKIE,
                ctx.cookie().set_cookie_header(ctx.default_scheme_value()),
            );
            response
        }
    }
}

/// **Check.** Requires a valid token in the cookie only.
pub async fn check(State(ctx): State<Arc<SessionContext>>, mut req: Request, next: Next) -> Response {
    let now = now_unix();
    let remote_ip = remote_ip(&req);
    let result = decode_and_validate(decode_cookie(&ctx, req.headers()), now, remote_ip);
    match result {
        Ok(token) => {
            attach(&mut req, token);
            next.run(req).await
        }
        Err(reason) => reject_or_lenient(&ctx, reason, req, next).await,
    }
}

/// **Vet.** Requires a valid token in the cookie or, failing that, the
/// `Authorization: Bearer i:<token>` header. Cookie is tried first; if it is
/// merely absent, the header is tried with no further comment. If the
/// cookie was present but malformed *and* the header also fails, the two
/// failures are combined into a [`RejectReason::Composite`].
pub async fn vet(State(ctx): State<Arc<SessionContext>>, mut req: Request, next: Next) -> Response {
    let now = now_unix();
    let remote_ip = remote_ip(&req);
    let headers = req.headers().clone();

    let cookie_result = decode_cookie(&ctx, &headers);
    let result = match cookie_result {
        Ok(token) => Ok(token),
        Err(RejectReason::NoTokenPresent) => decode_bearer(&ctx, &headers),
        Err(cookie_err) => match decode_bearer(&ctx, &headers) {
            Ok(token) => Ok(token),
            Err(RejectReason::NoTokenPresent) => Err(cookie_err),
            Err(header_err) => Err(RejectReason::Composite {
                cookie: Box::new(cookie_err),
                header: Box::new(header_err),
            }),
        },
    };
    let result = decode_and_validate(result, now, remote_ip);

    match result {
        Ok(token) => {
            attach(&mut req, token);
            next.run(req).await
        }
        Err(reason) => reject_or_lenient(&ctx, reason, req, next).await,
    }
}
