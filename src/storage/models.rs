//! Database models for the Bookmarks API.
//!
//! These are the row types returned by SQLx queries.

use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::Bookmark;
use crate::error::ApiError;

/// Database row for the bookmarks table.
#[derive(Debug, Clone, FromRow)]
pub struct BookmarkRow {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i64,
}

impl TryFrom<BookmarkRow> for Bookmark {
    type Error = ApiError;

    fn try_from(row: BookmarkRow) -> Result<Self, Self::Error> {
        Ok(Bookmark {
            id: Uuid::parse_str(&row.id).map_err(|e| ApiError::Internal(e.to_string()))?,
            title: row.title,
            url: row.url,
            description: row.description,
            rating: row.rating,
        })
    }
}
