//! HTTP request handlers.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::api::types::*;
use crate::domain::Bookmark;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Parse a path id. Ids that are not UUIDs cannot match a stored bookmark.
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bookmark_not_found())
}

/// List all bookmarks.
///
/// GET /bookmarks
#[utoipa::path(
    get,
    path = "/bookmarks",
    responses(
        (status = 200, description = "All bookmarks", body = Vec<Bookmark>),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookmarks"
)]
pub async fn list_bookmarks(State(state): State<AppState>) -> ApiResult<Json<Vec<Bookmark>>> {
    let bookmarks = state.repository.list_all().await?;

    tracing::debug!(count = bookmarks.len(), "Listed bookmarks");

    Ok(Json(
        bookmarks.into_iter().map(Bookmark::sanitized).collect(),
    ))
}

/// Create a bookmark.
///
/// POST /bookmarks
#[utoipa::path(
    post,
    path = "/bookmarks",
    request_body = CreateBookmarkRequest,
    responses(
        (status = 201, description = "Bookmark created", body = Bookmark),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookmarks"
)]
pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookmarkRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<Bookmark>)> {
    let Json(request) = payload?;

    let bookmark = request.draft.validate().map_err(|e| {
        tracing::warn!(error = %e, "Rejected bookmark");
        ApiError::from(e)
    })?;

    let stored = state.repository.insert(&bookmark).await?.sanitized();

    tracing::info!(
        bookmark_id = %stored.id,
        rating = stored.rating,
        "Bookmark created"
    );

    let location = stored.location();
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(stored),
    ))
}

/// Get a bookmark by ID.
///
/// GET /bookmarks/{id}
#[utoipa::path(
    get,
    path = "/bookmarks/{id}",
    params(("id" = String, Path, description = "Bookmark ID")),
    responses(
        (status = 200, description = "Bookmark", body = Bookmark),
        (status = 404, description = "Bookmark doesn't exist", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookmarks"
)]
pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Bookmark>> {
    let id = parse_id(&id)?;

    let bookmark = state
        .repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(bookmark_id = %id, "Bookmark not found");
            ApiError::bookmark_not_found()
        })?;

    Ok(Json(bookmark.sanitized()))
}

/// Update some fields of a bookmark.
///
/// PATCH /bookmarks/{id}
#[utoipa::path(
    patch,
    path = "/bookmarks/{id}",
    params(("id" = String, Path, description = "Bookmark ID")),
    request_body = UpdateBookmarkRequest,
    responses(
        (status = 204, description = "Bookmark updated"),
        (status = 400, description = "No fields supplied or invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Bookmark doesn't exist", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookmarks"
)]
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    // An empty body is an empty patch, rejected below with the field list.
    let request: UpdateBookmarkRequest = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateBookmarkRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let patch = request.patch.validate()?;
    let id = parse_id(&id)?;

    if state.repository.update_by_id(id, &patch).await? == 0 {
        return Err(ApiError::bookmark_not_found());
    }

    tracing::info!(bookmark_id = %id, "Bookmark updated");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a bookmark.
///
/// DELETE /bookmarks/{id}
#[utoipa::path(
    delete,
    path = "/bookmarks/{id}",
    params(("id" = String, Path, description = "Bookmark ID")),
    responses(
        (status = 204, description = "Bookmark deleted"),
        (status = 404, description = "Bookmark doesn't exist", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookmarks"
)]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    if state.repository.delete_by_id(id).await? == 0 {
        return Err(ApiError::bookmark_not_found());
    }

    tracing::info!(bookmark_id = %id, "Bookmark deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint.
///
/// Answers 503 with `status: "degraded"` when the database does not respond.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, database) = match state.repository.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed to reach database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                format!("error: {}", e),
            )
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}
