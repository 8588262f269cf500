// SQLite DocumentStore Implementation

use async_trait::async_trait;
use feedcycle_core::domain::{Collection, Document, DocumentId};
use feedcycle_core::error::{AppError, Result};
use feedcycle_core::port::{DocumentStore, TimeProvider};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tracing::debug;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            Some(code) => match code.as_ref() {
                "2067" | "1555" => AppError::Database(format!(
                    "Unique constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                "5" => AppError::Database(format!(
                    "Database locked (SQLITE_BUSY): {}",
                    db_err.message()
                )),
                "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                other => AppError::Database(format!(
                    "Database error [{}]: {}",
                    other,
                    db_err.message()
                )),
            },
            None => AppError::Database(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

/// Document store handle backed by a SQLite pool
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }

    /// Underlying pool (for maintenance and tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Distinct collection names, sorted
    pub async fn collections(&self) -> Result<Vec<Collection>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT collection FROM documents ORDER BY collection")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        names
            .into_iter()
            .map(|name| Collection::new(name).map_err(AppError::from))
            .collect()
    }
}

fn row_to_document(row: &SqliteRow) -> Result<Document> {
    let collection: String = row.try_get("collection").map_err(map_sqlx_error)?;
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let data: String = row.try_get("data").map_err(map_sqlx_error)?;
    let updated_at: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

    Ok(Document {
        id: DocumentId::new(id)?,
        collection: Collection::new(collection)?,
        data: serde_json::from_str(&data)?,
        updated_at,
    })
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &Collection, id: &DocumentId) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT collection, id, data, updated_at FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn set(&self, mut document: Document) -> Result<Document> {
        document.updated_at = self.time_provider.now_millis();
        let data = serde_json::to_string(&document.data)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (collection, id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(document.collection.as_str())
        .bind(document.id.as_str())
        .bind(data)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(
            collection = %document.collection,
            id = %document.id,
            updated_at = document.updated_at,
            "Document written"
        );

        Ok(document)
    }

    async fn delete(&self, collection: &Collection, id: &DocumentId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, collection: &Collection, limit: u32) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT collection, id, data, updated_at FROM documents
            WHERE collection = ?
            ORDER BY updated_at DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(collection.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_document).collect()
    }

    async fn count(&self, collection: &Collection) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
