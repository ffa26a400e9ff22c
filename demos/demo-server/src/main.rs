//! Incorruptible session demo server.
//!
//! Exercises Set, Check, and Vet end to end behind a handful of toy routes.
//! Not an endorsement of any particular route layout — just enough surface
//! to show the three middleware layers doing their job.
//!
//! Configuration (environment variables):
//!   DEMO_PORT           - Listen port (default: 3000)
//!   DEMO_BASE_URL       - Deployment base URL, e.g. https://example.com/app
//!                         (default: http://localhost:3000)
//!   DEMO_LOG_FORMAT     - "json" for structured logging, "pretty" for dev
//!   DEMO_KEY_HEX        - 32 hex chars (16 bytes) AEAD key (dev default if unset)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use incorruptible_session::{Deployment, SessionContext, SessionToken};
use incorruptible_token::DecodedToken;

type Shared = Arc<SessionContext>;

async fn health() -> &'static str {
    "ok"
}

/// Demonstrates Set: always runs, attaches whatever token is present (or the
/// default) to the request, and reports what it saw.
async fn whoami(token: Option<SessionToken>) -> impl IntoResponse {
    match token {
        Some(SessionToken(t)) if t.value_count() > 0 => {
            Json(serde_json::json!({ "authenticated": true, "values": t.value_count() }))
        }
        _ => Json(serde_json::json!({ "authenticated": false })),
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
}

/// Mints a real session token for `username` and sets it via `Set-Cookie`.
/// This is application code, not middleware — `SessionContext::issue` is the
/// seam a real login handler calls after checking a password.
async fn login(State(ctx): State<Shared>, Json(body): Json<LoginRequest>) -> impl IntoResponse {
    let mut token = DecodedToken::new();
    token.set_str(0, &body.username);
    match ctx.issue(token, None) {
        Ok((set_cookie, _)) => {
            let mut response = StatusCode::OK.into_response();
            response.headers_mut().insert(axum::http::header::SET_COOKIE, set_cookie);
            response
        }
        Err(err) => {
            tracing::warn!(%err, "failed to mint session token");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Demonstrates Check: requires a valid cookie, returns the bound username.
async fn account(token: Option<SessionToken>) -> impl IntoResponse {
    match token {
        Some(SessionToken(t)) => Json(serde_json::json!({ "username": t.get_str(0) })).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Demonstrates Vet: requires a valid cookie or bearer header, useful for an
/// API surface consumed by both browser and service clients.
async fn api_ping(token: Option<SessionToken>) -> impl IntoResponse {
    match token {
        Some(SessionToken(_)) => "pong",
        None => "pong (unauthenticated path never reached)",
    }
}

fn build_context() -> Shared {
    let base_url = std::env::var("DEMO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());
    let deployment = Deployment::new(&base_url, "https://example.com/docs/errors")
        .expect("DEMO_BASE_URL must be a valid absolute URL");

    let key_hex = std::env::var("DEMO_KEY_HEX").unwrap_or_else(|_| "000102030405060708090a0b0c0d0e0f".into());
    let mut key = [0u8; 16];
    hex_decode(&key_hex, &mut key).expect("DEMO_KEY_HEX must be 32 hex characters");

    Arc::new(SessionContext::new(key, 0x51, deployment, Duration::from_secs(3600), true))
}

fn hex_decode(s: &str, out: &mut [u8; 16]) -> Result<(), ()> {
    if s.len() != 32 {
        return Err(());
    }
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let byte = u8::from_str_radix(std::str::from_utf8(chunk).map_err(|_| ())?, 16).map_err(|_| ())?;
        out[i] = byte;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let log_format = std::env::var("DEMO_LOG_FORMAT").unwrap_or_else(|_| "pretty".into());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "demo_server=info,tower_http=info".into());
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).with_target(true).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let port: u16 = std::env::var("DEMO_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);
    let ctx = build_context();
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/", get(whoami))
        .route("/login", post(login))
        .route("/account", get(account).layer(middleware::from_fn_with_state(ctx.clone(), incorruptible_session::check)))
        .route("/api/ping", get(api_ping).layer(middleware::from_fn_with_state(ctx.clone(), incorruptible_session::vet)))
        .layer(middleware::from_fn_with_state(ctx.clone(), incorruptible_session::set))
        .layer(cors)
        .with_state(ctx);

    tracing::info!(port, "starting incorruptible session demo server");
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .unwrap();
}
