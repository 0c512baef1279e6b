use crate::error::{AppError, Result};
use crate::state::{Document, DocumentStore, Query};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Persistent document store using the Sled embedded database.
///
/// Each collection is its own tree; keys are document ids and values are
/// JSON-encoded field maps, so iteration order is id order.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
}

impl SledStore {
    /// Create a new Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref();
        let db = sled::open(&path).map_err(|e| {
            AppError::Internal(format!("Failed to open Sled database: {}", e))
        })?;

        tracing::info!("Initialized Sled store at {:?}", path_str);

        Ok(Self { db: Arc::new(db) })
    }

    /// Flush all pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(|e| {
            AppError::Internal(format!("Failed to flush database: {}", e))
        })?;
        Ok(())
    }

    fn tree(&self, collection: &str) -> Result<sled::Tree> {
        self.db.open_tree(collection).map_err(|e| {
            AppError::Database(format!("Failed to open collection '{}': {}", collection, e))
        })
    }

    fn serialize_fields(fields: &Map<String, Value>) -> Result<Vec<u8>> {
        serde_json::to_vec(fields).map_err(|e| {
            AppError::Serialization(format!("Failed to serialize document: {}", e))
        })
    }

    fn deserialize_fields(bytes: &[u8]) -> Result<Map<String, Value>> {
        serde_json::from_slice(bytes).map_err(|e| {
            AppError::Serialization(format!("Failed to deserialize document: {}", e))
        })
    }

    fn read_all(&self, collection: &str) -> Result<Vec<Document>> {
        let tree = self.tree(collection)?;
        let mut documents = Vec::with_capacity(tree.len());

        for entry in tree.iter() {
            let (key, value) = entry?;
            let id = String::from_utf8(key.to_vec()).map_err(|e| {
                AppError::Database(format!("Invalid document key in '{}': {}", collection, e))
            })?;
            documents.push(Document::new(id, Self::deserialize_fields(&value)?));
        }

        Ok(documents)
    }

    fn write(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<()> {
        let tree = self.tree(collection)?;
        tree.insert(id.as_bytes(), Self::serialize_fields(fields)?)?;
        tree.flush().map_err(|e| {
            AppError::Internal(format!("Failed to flush collection '{}': {}", collection, e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SledStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        query.validate()?;
        Ok(query.apply(self.read_all(collection)?))
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.read_all(collection)
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.write(collection, &id, &fields)?;

        tracing::debug!(collection, document_id = %id, "Document added to Sled");
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.write(collection, id, &fields)
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        let tree = self.tree(collection)?;
        let existing = tree.get(id.as_bytes())?.ok_or_else(|| {
            AppError::NotFound(format!("Document {}/{} not found", collection, id))
        })?;

        let mut merged = Self::deserialize_fields(&existing)?;
        for (key, value) in fields {
            merged.insert(key, value);
        }

        self.write(collection, id, &merged)?;

        tracing::debug!(collection, document_id = %id, "Document updated in Sled");
        Ok(())
    }

    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<usize> {
        let tree = self.tree(collection)?;

        let mut batch = sled::Batch::default();
        let mut removed = 0;
        for id in ids {
            if tree.contains_key(id.as_bytes())? {
                batch.remove(id.as_bytes());
                removed += 1;
            }
        }

        tree.apply_batch(batch)?;
        tree.flush().map_err(|e| {
            AppError::Internal(format!("Failed to flush collection '{}': {}", collection, e))
        })?;

        tracing::debug!(collection, removed, "Documents deleted from Sled");
        Ok(removed)
    }
}
