//! Repository layer for database operations.

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::domain::{Bookmark, BookmarkPatch};
use crate::error::ApiResult;
use crate::storage::models::BookmarkRow;

/// Repository for bookmark persistence.
///
/// Holds no business rules: validation and sanitization happen before a
/// value reaches this type. Every method is a single round-trip.
#[derive(Clone)]
pub struct BookmarkRepository {
    pool: SqlitePool,
}

impl BookmarkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to check the database is reachable.
    pub async fn ping(&self) -> ApiResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> ApiResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                description TEXT,
                rating INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List every bookmark in insertion order.
    pub async fn list_all(&self) -> ApiResult<Vec<Bookmark>> {
        let rows: Vec<BookmarkRow> = sqlx::query_as(
            "SELECT id, title, url, description, rating FROM bookmarks ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Insert a bookmark and return the stored row.
    pub async fn insert(&self, bookmark: &Bookmark) -> ApiResult<Bookmark> {
        let row: BookmarkRow = sqlx::query_as(
            r#"
            INSERT INTO bookmarks (id, title, url, description, rating)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, url, description, rating
            "#,
        )
        .bind(bookmark.id.to_string())
        .bind(&bookmark.title)
        .bind(&bookmark.url)
        .bind(&bookmark.description)
        .bind(bookmark.rating)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Find a bookmark by id.
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Bookmark>> {
        let row: Option<BookmarkRow> = sqlx::query_as(
            "SELECT id, title, url, description, rating FROM bookmarks WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Bookmark::try_from).transpose()
    }

    /// Delete a bookmark. Returns the number of rows removed.
    pub async fn delete_by_id(&self, id: Uuid) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Apply the supplied fields of a patch. Returns the number of rows touched.
    pub async fn update_by_id(&self, id: Uuid, patch: &BookmarkPatch) -> ApiResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE bookmarks SET
                title = COALESCE(?, title),
                url = COALESCE(?, url),
                description = COALESCE(?, description),
                rating = COALESCE(?, rating)
            WHERE id = ?
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.url)
        .bind(&patch.description)
        .bind(patch.rating)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> BookmarkRepository {
        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        let repo = BookmarkRepository::new(pool);
        repo.init_schema().await.expect("Failed to init schema");
        repo
    }

    fn bookmark(title: &str, rating: i64) -> Bookmark {
        Bookmark {
            id: Uuid::new_v4(),
            title: title.to_string(),
            url: format!("https://www.{}.com", title.to_lowercase().replace(' ', "")),
            description: Some(format!("A website for {}.", title)),
            rating,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = setup_test_db().await;
        let bm = bookmark("Goofball Boys", 2);

        let stored = repo.insert(&bm).await.unwrap();
        assert_eq!(stored, bm);

        let found = repo.find_by_id(bm.id).await.unwrap();
        assert_eq!(found, Some(bm));
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let repo = setup_test_db().await;
        assert!(repo.ping().await.is_ok());

        repo.pool().close().await;
        assert!(repo.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repo = setup_test_db().await;
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let repo = setup_test_db().await;
        assert!(repo.list_all().await.unwrap().is_empty());

        let first = bookmark("Reggie Jackson", 5);
        let second = bookmark("Janet Jackson", 1);
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_only_supplied_fields() {
        let repo = setup_test_db().await;
        let bm = bookmark("Goofball Gals", 3);
        repo.insert(&bm).await.unwrap();

        let patch = BookmarkPatch {
            rating: Some(4),
            ..Default::default()
        };
        assert_eq!(repo.update_by_id(bm.id, &patch).await.unwrap(), 1);

        let updated = repo.find_by_id(bm.id).await.unwrap().unwrap();
        assert_eq!(updated.rating, 4);
        assert_eq!(updated.title, bm.title);
        assert_eq!(updated.url, bm.url);
        assert_eq!(updated.description, bm.description);
    }

    #[tokio::test]
    async fn test_update_missing_touches_nothing() {
        let repo = setup_test_db().await;
        let patch = BookmarkPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.update_by_id(Uuid::new_v4(), &patch).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_reports_affected_rows() {
        let repo = setup_test_db().await;
        let bm = bookmark("Goofball Boys", 2);
        repo.insert(&bm).await.unwrap();

        assert_eq!(repo.delete_by_id(bm.id).await.unwrap(), 1);
        assert_eq!(repo.delete_by_id(bm.id).await.unwrap(), 0);
        assert!(repo.find_by_id(bm.id).await.unwrap().is_none());
    }
}
