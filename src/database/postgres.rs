use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{Collection, DatabaseError, DatabaseManager, Document, DocumentStore, Page};

type DocumentRow = (Uuid, Json<Value>);

/// Document store backed by a single JSONB table in Postgres.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_document((id, Json(body)): DocumentRow) -> Result<Document, DatabaseError> {
    match body {
        Value::Object(map) => Ok(Document::new(id, map)),
        _ => Err(DatabaseError::QueryError(format!(
            "document {} has a non-object body",
            id
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, DatabaseError> {
        let id = Uuid::new_v4();
        let body = Value::Object(body);

        let row: DocumentRow = sqlx::query_as(
            "INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3) RETURNING id, body",
        )
        .bind(id)
        .bind(collection.as_str())
        .bind(Json(&body))
        .fetch_one(&self.pool)
        .await?;

        row_to_document(row)
    }

    async fn find_all(&self, collection: Collection, page: Page) -> Result<Vec<Document>, DatabaseError> {
        // LIMIT NULL means no limit in Postgres
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY seq LIMIT $2 OFFSET $3",
        )
        .bind(collection.as_str())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_document).collect()
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT id, body FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_document).transpose()
    }

    async fn find_one_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Option<Document>, DatabaseError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = $1 AND body -> $2 = $3 ORDER BY seq LIMIT 1",
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(Json(value))
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_document).transpose()
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Document>, DatabaseError> {
        // jsonb || is a shallow merge, matching Document::merge
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            UPDATE documents
            SET body = body || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            RETURNING id, body
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(Value::Object(changes)))
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_document).transpose()
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
