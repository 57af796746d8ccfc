pub mod document;
pub mod manager;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

pub use document::{Collection, Document, Page, ID_FIELD};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// CRUD over named collections of schemaless JSON documents.
///
/// Bodies are opaque: the store assigns `_id` and otherwise keeps whatever
/// object the caller sent.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, DatabaseError>;

    /// Documents in insertion order
    async fn find_all(&self, collection: Collection, page: Page) -> Result<Vec<Document>, DatabaseError>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError>;

    /// First document whose top-level `field` equals `value`
    async fn find_one_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Option<Document>, DatabaseError>;

    /// Shallow-merge `changes` into the document. `None` when it does not exist.
    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Document>, DatabaseError>;

    /// `true` when a document was removed
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
