//! Request-context attachment: the typed key Set/Check/Vet use to stash the
//! decoded token, and the extractor downstream handlers retrieve it with.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use incorruptible_token::DecodedToken;

use crate::error::MissingSessionToken;

/// The value actually stored in `Request::extensions`. Wrapped in its own
/// type (rather than storing a bare [`DecodedToken`]) so no other crate's
/// `insert::<DecodedToken>()` can collide with it.
#[derive(Clone)]
pub(crate) struct Attached(pub DecodedToken);

pub(crate) fn attach(req: &mut axum::extract::Request, token: DecodedToken) {
    req.extensions_mut().insert(Attached(token));
}

/// Retrieves the token the Set/Check/Vet middleware attached to this
/// request. Missing means the middleware didn't run for this route — a
/// distinct, logged error, never silently treated as an empty token.
#[derive(Debug, Clone)]
pub struct SessionToken(pub DecodedToken);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = MissingSessionToken;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Attached>()
            .cloned()
            .map(|attached| SessionToken(attached.0))
            .ok_or(MissingSessionToken)
    }
}
