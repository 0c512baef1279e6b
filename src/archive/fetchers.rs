//! Per-collection fetchers for terminal-state records

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::window::FetchCriteria;
use crate::metrics::{ARCHIVE_FETCH_FAILURES_TOTAL, ARCHIVE_RECORDS_FETCHED_TOTAL};
use crate::models::{ArchiveRecord, CollectionKind, CollectionSpec};
use crate::state::DocumentStore;

/// Queries one source collection for records that reached a terminal status
#[derive(Debug, Clone, Copy)]
pub struct CollectionFetcher {
    spec: &'static CollectionSpec,
    limit: usize,
}

impl CollectionFetcher {
    pub fn new(kind: CollectionKind, limit: usize) -> Self {
        Self {
            spec: kind.spec(),
            limit,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.spec.kind
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch and tag matching records, propagating store failures
    pub async fn try_fetch(
        &self,
        store: &dyn DocumentStore,
        criteria: &FetchCriteria,
    ) -> ArchiveResult<Vec<ArchiveRecord>> {
        let collection = self.spec.kind.as_ref();
        let query = criteria.query_for(self.spec, self.limit);

        let documents = store
            .query(collection, &query)
            .await
            .map_err(|e| ArchiveError::FetchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        ARCHIVE_RECORDS_FETCHED_TOTAL
            .with_label_values(&[collection])
            .inc_by(documents.len() as f64);

        tracing::debug!(collection, count = documents.len(), "Fetched archive records");

        Ok(documents
            .into_iter()
            .map(|doc| ArchiveRecord::from_document(doc, self.spec.kind))
            .collect())
    }

    /// Fetch and tag matching records. A store failure is logged and yields
    /// no records, so one collection's outage only thins the report.
    pub async fn fetch(
        &self,
        store: &dyn DocumentStore,
        criteria: &FetchCriteria,
    ) -> Vec<ArchiveRecord> {
        match self.try_fetch(store, criteria).await {
            Ok(records) => records,
            Err(e) => {
                ARCHIVE_FETCH_FAILURES_TOTAL
                    .with_label_values(&[self.spec.kind.as_ref()])
                    .inc();
                tracing::error!(
                    collection = %self.spec.kind,
                    error = %e,
                    "Collection fetch failed, continuing without it"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::window::DateWindow;
    use crate::models::RecordType;
    use crate::state::InMemoryStore;
    use serde_json::{json, Value};

    async fn seed(store: &InMemoryStore, collection: &str, id: &str, fields: Value) {
        store
            .set(collection, id, fields.as_object().cloned().unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_work_orders_terminal_statuses() {
        let store = InMemoryStore::new();
        seed(&store, "work_orders", "a", json!({"status": "Completed"})).await;
        seed(&store, "work_orders", "b", json!({"status": "Cancelled"})).await;
        seed(&store, "work_orders", "c", json!({"status": "In Progress"})).await;

        let fetcher = CollectionFetcher::new(CollectionKind::WorkOrders, 5000);
        let records = fetcher.fetch(&store, &FetchCriteria::default()).await;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(records.iter().all(|r| r.record_type == RecordType::WorkOrder));
    }

    #[tokio::test]
    async fn test_maintenance_uses_archived_flag() {
        let store = InMemoryStore::new();
        seed(&store, "maintenance_tasks", "a", json!({"archived": true, "status": "Completed"})).await;
        seed(&store, "maintenance_tasks", "b", json!({"archived": false, "status": "Completed"})).await;

        let fetcher = CollectionFetcher::new(CollectionKind::MaintenanceTasks, 5000);
        let records = fetcher.fetch(&store, &FetchCriteria::default()).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }

    #[tokio::test]
    async fn test_issue_date_range_uses_resolution_date() {
        let store = InMemoryStore::new();
        seed(&store, "issue_logs", "in", json!({"status": "Resolved", "resolutionDate": "2024-01-31T18:30:00Z"})).await;
        seed(&store, "issue_logs", "out", json!({"status": "Resolved", "resolutionDate": "2024-02-01T00:00:00Z"})).await;
        seed(&store, "issue_logs", "wrong-field", json!({"status": "Closed", "completedAt": "2024-01-15T00:00:00Z"})).await;

        let criteria = FetchCriteria {
            window: DateWindow::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap(),
            ..Default::default()
        };
        let fetcher = CollectionFetcher::new(CollectionKind::IssueLogs, 5000);
        let records = fetcher.fetch(&store, &criteria).await;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["in"]);
    }

    #[tokio::test]
    async fn test_limit_caps_results() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            seed(&store, "inspection_records", &format!("r{}", i), json!({"status": "Completed"})).await;
        }

        let fetcher = CollectionFetcher::new(CollectionKind::InspectionRecords, 3);
        let records = fetcher.fetch(&store, &FetchCriteria::default()).await;
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_conflicting_status_matches_nothing() {
        let store = InMemoryStore::new();
        seed(&store, "work_orders", "a", json!({"status": "Open"})).await;
        seed(&store, "work_orders", "b", json!({"status": "Closed"})).await;

        let criteria = FetchCriteria {
            status: Some("Open".to_string()),
            ..Default::default()
        };
        let fetcher = CollectionFetcher::new(CollectionKind::WorkOrders, 5000);
        assert!(fetcher.fetch(&store, &criteria).await.is_empty());
    }
}
