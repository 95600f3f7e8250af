//! PostgreSQL document store
//!
//! Each collection is a table holding one JSONB document per row.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use tracing::info;
use uuid::Uuid;

use super::{Collection, DocumentStore, Filter};
use crate::error::{StoreError, StoreResult};

/// Document store backed by PostgreSQL JSONB columns
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the collection tables if they do not exist yet
    pub async fn ensure_collections(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            let table = collection.name();

            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY,
                    doc JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#
            ))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Bootstrap(format!("{}: {}", table, e)))?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS {table}_doc_idx ON {table} USING GIN (doc jsonb_path_ops)"
            ))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Bootstrap(format!("{}: {}", table, e)))?;

            for field in collection.unique_fields() {
                let index = unique_index(collection, field);

                sqlx::query(&format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS {index} ON {table} ((doc->>'{field}'))"
                ))
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Bootstrap(format!("{}: {}", index, e)))?;
            }
        }

        info!("Document collections ready");
        Ok(())
    }
}

fn unique_index(collection: Collection, field: &str) -> String {
    format!("{}_{}_key", collection, field)
}

/// Map a violated unique field index to `StoreError::Conflict`
fn insert_error(collection: Collection, error: sqlx::Error) -> StoreError {
    let violated = error
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
        .and_then(|constraint| {
            collection
                .unique_fields()
                .iter()
                .find(|field| unique_index(collection, field) == constraint)
                .copied()
        });

    match violated {
        Some(field) => StoreError::Conflict {
            collection: collection.name(),
            field,
        },
        None => StoreError::Query(error),
    }
}

fn decode(row: &PgRow) -> StoreResult<Value> {
    let Json(document): Json<Value> = row.try_get("doc").map_err(StoreError::Query)?;
    Ok(document)
}

fn decode_all(rows: Vec<PgRow>) -> StoreResult<Vec<Value>> {
    rows.iter().map(decode).collect()
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()> {
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection);

        sqlx::query(&sql)
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(collection, e))?;

        Ok(())
    }

    async fn get(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn get_many(&self, collection: Collection, ids: &[Uuid]) -> StoreResult<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT doc FROM {} WHERE id = ANY($1) ORDER BY created_at, id",
            collection
        );

        let rows = sqlx::query(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        decode_all(rows)
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        let sql = format!("SELECT doc FROM {} ORDER BY created_at, id", collection);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        decode_all(rows)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY created_at, id",
            collection
        );

        let rows = sqlx::query(&sql)
            .bind(Json(filter.to_json()))
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        decode_all(rows)
    }
}
