pub mod factory;
pub mod query;
pub mod sled_store;
pub mod store;

pub use factory::{create_in_memory_store, create_store};
pub use query::{compare_values, Filter, FilterOp, Query, MAX_IN_LIST};
pub use sled_store::SledStore;
pub use store::InMemoryStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: an opaque id plus its semi-structured fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Trait for document store operations over named collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a filtered query against a collection
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>>;

    /// Fetch every document in a collection
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Add a document under a generated id, returning the id
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String>;

    /// Create or replace a document under a known id
    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()>;

    /// Merge fields into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()>;

    /// Delete a batch of documents, returning how many existed
    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<usize>;
}
