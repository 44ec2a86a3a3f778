//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::BearerTokenValidator;
use crate::error::ApiError;

/// Require `Authorization: Bearer <token>` matching the configured API token.
pub async fn require_bearer_token(
    State(validator): State<BearerTokenValidator>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    if !validator.validate(token) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Unauthorized request"
        );
        return Err(ApiError::Unauthorized("Unauthorized request".to_string()));
    }

    Ok(next.run(request).await)
}
