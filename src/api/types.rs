//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookmarkDraft, BookmarkPatch};

// ==================== Bookmarks ====================

/// Request to create a bookmark.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookmarkRequest {
    /// Candidate fields; `title`, `url` and `rating` are required.
    #[serde(flatten)]
    pub draft: BookmarkDraft,
}

/// Request to update some fields of a bookmark.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBookmarkRequest {
    /// Fields to change; at least one must be present.
    #[serde(flatten)]
    pub patch: BookmarkPatch,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
    /// Timestamp.
    pub timestamp: String,
}
