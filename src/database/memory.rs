use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, DatabaseError, Document, DocumentStore, Page};

/// In-process store used when no `DATABASE_URL` is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, DatabaseError> {
        let document = Document::new(Uuid::new_v4(), body);
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(document.clone());
        Ok(document)
    }

    async fn find_all(&self, collection: Collection, page: Page) -> Result<Vec<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let offset = usize::try_from(page.offset).unwrap_or(0);
        let limit = page
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));

        Ok(documents.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn find_one_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.field(field) == Some(value)))
            .cloned())
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Document>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(None);
        };

        document.merge(changes);
        Ok(Some(document.clone()))
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        Document::body_from_json(value).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_all_in_order() {
        let store = MemoryDocumentStore::new();
        for name in ["Pottery", "Painting", "Piano"] {
            store.insert(Collection::Classes, body(json!({"name": name}))).await.unwrap();
        }

        let docs = store.find_all(Collection::Classes, Page::default()).await.unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.body["name"].clone()).collect();
        assert_eq!(names, vec![json!("Pottery"), json!("Painting"), json!("Piano")]);

        // Collections are independent
        assert!(store.find_all(Collection::Events, Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_paginates() {
        let store = MemoryDocumentStore::new();
        for i in 0..5 {
            store.insert(Collection::Events, body(json!({"n": i}))).await.unwrap();
        }

        let page = Page { limit: Some(2), offset: 1 };
        let docs = store.find_all(Collection::Events, page).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body["n"], json!(1));
        assert_eq!(docs[1].body["n"], json!(2));

        let page = Page { limit: Some(0), offset: 0 };
        assert!(store.find_all(Collection::Events, page).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_id_and_field() {
        let store = MemoryDocumentStore::new();
        let inserted = store
            .insert(Collection::Users, body(json!({"email": "a@example.com", "role": "student"})))
            .await
            .unwrap();

        let found = store.find_by_id(Collection::Users, inserted.id).await.unwrap();
        assert_eq!(found, Some(inserted.clone()));

        let by_email = store
            .find_one_by(Collection::Users, "email", &json!("a@example.com"))
            .await
            .unwrap();
        assert_eq!(by_email.map(|d| d.id), Some(inserted.id));

        // Wrong collection
        assert!(store.find_by_id(Collection::Classes, inserted.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .insert(Collection::Classes, body(json!({"name": "Pottery", "status": "pending"})))
            .await
            .unwrap();

        let updated = store
            .update(Collection::Classes, doc.id, body(json!({"status": "approved"})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.body["name"], json!("Pottery"));
        assert_eq!(updated.body["status"], json!("approved"));

        let missing = store
            .update(Collection::Classes, Uuid::new_v4(), body(json!({"status": "x"})))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryDocumentStore::new();
        let doc = store.insert(Collection::Categories, body(json!({"name": "Art"}))).await.unwrap();

        assert!(store.delete(Collection::Categories, doc.id).await.unwrap());
        assert!(!store.delete(Collection::Categories, doc.id).await.unwrap());
        assert!(!store.delete(Collection::Payments, doc.id).await.unwrap());
    }
}
