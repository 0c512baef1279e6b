//! Common test utilities for archive integration tests
//!
//! Seeding helpers for the four source collections and a store wrapper that
//! fails on demand for one collection.

#![allow(dead_code)]

use async_trait::async_trait;
use facility_archive::error::{AppError, Result};
use facility_archive::state::{Document, DocumentStore, InMemoryStore, Query};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Convert a `json!` object into document fields
pub fn fields(value: Value) -> Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("test documents must be JSON objects")
}

/// Insert a document under a fixed id
pub async fn seed(store: &dyn DocumentStore, collection: &str, id: &str, value: Value) {
    store.set(collection, id, fields(value)).await.unwrap();
}

/// A store with one terminal record in each source collection
pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());

    seed(
        store.as_ref(),
        "maintenance_tasks",
        "mt-1",
        serde_json::json!({"archived": true, "status": "Completed", "title": "Lubricate pump bearings", "completedAt": "2024-01-05T08:00:00Z", "cost": 120}),
    )
    .await;
    seed(
        store.as_ref(),
        "work_orders",
        "wo-1",
        serde_json::json!({"status": "Closed", "title": "Fix lobby door", "completedAt": "2024-01-20T16:30:00Z", "cost": "80.50"}),
    )
    .await;
    seed(
        store.as_ref(),
        "issue_logs",
        "is-1",
        serde_json::json!({"status": "Resolved", "title": "Leak in boiler room", "resolutionDate": "2024-01-12T11:00:00Z"}),
    )
    .await;
    seed(
        store.as_ref(),
        "inspection_records",
        "in-1",
        serde_json::json!({"status": "Completed", "type": "Fire Safety", "completedAt": "2024-01-28T09:15:00Z"}),
    )
    .await;

    store
}

/// Delegating store whose queries fail for selected collections
pub struct FailingStore {
    inner: Arc<dyn DocumentStore>,
    failing_queries: Mutex<HashSet<String>>,
    fail_writes: bool,
}

impl FailingStore {
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            failing_queries: Mutex::new(HashSet::new()),
            fail_writes: false,
        }
    }

    pub fn fail_queries_on(self, collection: &str) -> Self {
        self.failing_queries
            .lock()
            .unwrap()
            .insert(collection.to_string());
        self
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn check_query(&self, collection: &str) -> Result<()> {
        if self.failing_queries.lock().unwrap().contains(collection) {
            return Err(AppError::Database(format!("{} is unavailable", collection)));
        }
        Ok(())
    }

    fn check_write(&self, collection: &str) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::Database(format!("writes to {} rejected", collection)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        self.check_query(collection)?;
        self.inner.query(collection, query).await
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.check_query(collection)?;
        self.inner.fetch_all(collection).await
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        self.check_write(collection)?;
        self.inner.add(collection, fields).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.check_write(collection)?;
        self.inner.set(collection, id, fields).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.check_write(collection)?;
        self.inner.update(collection, id, fields).await
    }

    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<usize> {
        self.check_write(collection)?;
        self.inner.batch_delete(collection, ids).await
    }
}

/// Sample lines of the Prometheus text exposition, keyed by metric name
pub fn parse_prometheus_output(output: &str) -> HashMap<String, Vec<String>> {
    let mut metrics: HashMap<String, Vec<String>> = HashMap::new();

    for line in output.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let name = line
            .split(|c: char| c == '{' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        metrics.entry(name.to_string()).or_default().push(line.to_string());
    }

    metrics
}
