use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::TokenService;
use crate::error::ApiError;

/// Why a request was turned away before reaching its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::MissingToken => ApiError::missing_token(),
            AuthRejection::InvalidToken => ApiError::invalid_token(),
        }
    }
}

/// Bearer token middleware. On success the verified
/// [`Principal`](crate::auth::Principal) is stored in the request extensions.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let principal = tokens.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        AuthRejection::InvalidToken
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// The token is the second space-separated word of the `Authorization` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthRejection::MissingToken)?;

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.split_whitespace().nth(1))
        .ok_or(AuthRejection::InvalidToken)
}
