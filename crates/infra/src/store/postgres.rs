//! Postgres-backed document store.
//!
//! Every collection shares one `documents` table keyed by `(collection, id)`.
//! Business-key uniqueness is a partial unique index on
//! `(collection, business_key)`, so concurrent inserts of the same key are
//! resolved by the database, not by the caller.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Code | StoreError |
//! |------------|-----------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any | `Unavailable` |
//! | PoolClosed / Io / other | N/A | `Unavailable` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use adminhub_core::RecordId;

use super::r#trait::{DocumentStore, StoreError, StoredDocument};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection   TEXT        NOT NULL,
        id           UUID        NOT NULL,
        business_key TEXT,
        body         JSONB       NOT NULL,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS documents_business_key_uq
        ON documents (collection, business_key)
        WHERE business_key IS NOT NULL
    "#,
];

/// Document store over a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", None, e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Idempotent schema setup.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", None, e))?;
        }
        Ok(())
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<StoredDocument, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Serialization(format!("document row: {e}"));
    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let business_key: Option<String> = row.try_get("business_key").map_err(decode)?;
    let Json(body): Json<serde_json::Value> = row.try_get("body").map_err(decode)?;
    Ok(StoredDocument {
        id: RecordId::from_uuid(id),
        business_key,
        body,
    })
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, doc), fields(id = %doc.id, key = ?doc.business_key), err)]
    async fn insert(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, business_key, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(collection)
        .bind(doc.id.as_uuid())
        .bind(doc.business_key.as_deref())
        .bind(Json(&doc.body))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, doc.business_key.as_deref(), e))?;
        Ok(())
    }

    #[instrument(skip(self, doc), fields(id = %doc.id, key = ?doc.business_key), err)]
    async fn replace(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET business_key = $3, body = $4, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(doc.id.as_uuid())
        .bind(doc.business_key.as_deref())
        .bind(Json(&doc.body))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, doc.business_key.as_deref(), e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query(
            "SELECT id, business_key, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, None, e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query(
            "SELECT id, business_key, body FROM documents WHERE collection = $1 AND business_key = $2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, None, e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, business_key, body FROM documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, None, e))?;

        rows.iter().map(row_to_document).collect()
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, None, e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn business_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT business_key FROM documents WHERE collection = $1 AND business_key IS NOT NULL",
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, None, e))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("business_key")
                    .map_err(|e| StoreError::Serialization(format!("business_key: {e}")))
            })
            .collect()
    }
}

/// Map SQLx errors onto [`StoreError`]. Only `23505` is a conflict.
fn map_sqlx_error(context: &str, key: Option<&str>, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Conflict {
                    collection: context.to_string(),
                    key: key.unwrap_or_default().to_string(),
                }
            } else {
                StoreError::Unavailable(format!("database error in {context}: {}", db_err.message()))
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {context}"))
        }
        other => StoreError::Unavailable(format!("sqlx error in {context}: {other}")),
    }
}
