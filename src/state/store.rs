use crate::error::{AppError, Result};
use crate::state::{Document, DocumentStore, Query};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

type Collection = BTreeMap<String, Map<String, Value>>;

/// In-memory document store (for development and testing)
#[derive(Clone)]
pub struct InMemoryStore {
    collections: Arc<DashMap<String, Collection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(DashMap::new()),
        }
    }

    /// Number of documents currently held in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        query.validate()?;
        Ok(query.apply(self.snapshot(collection)))
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.snapshot(collection))
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);

        tracing::debug!(collection, document_id = %id, "Document added");
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        let mut docs = self.collections.get_mut(collection).ok_or_else(|| {
            AppError::NotFound(format!("Document {}/{} not found", collection, id))
        })?;

        let existing = docs.get_mut(id).ok_or_else(|| {
            AppError::NotFound(format!("Document {}/{} not found", collection, id))
        })?;

        for (key, value) in fields {
            existing.insert(key, value);
        }

        tracing::debug!(collection, document_id = %id, "Document updated");
        Ok(())
    }

    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<usize> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(0);
        };

        let removed = ids.iter().filter(|id| docs.remove(*id).is_some()).count();

        tracing::debug!(collection, removed, "Documents deleted");
        Ok(removed)
    }
}
