//! Audit records for generated reports

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::reports::ArchiveReportRequest;
use crate::archive::summary::ReportSummary;
use crate::models::ArchiveRecord;
use crate::state::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Compact record of one report generation. Holds a sample of the result,
/// never the full set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReportAudit {
    pub request: ArchiveReportRequest,
    pub summary: ReportSummary,
    pub total_records: usize,
    pub generated_at: String,
    pub requested_by: String,
    pub sample_data: Vec<ArchiveRecord>,
}

impl GeneratedReportAudit {
    pub fn new(
        request: &ArchiveReportRequest,
        summary: &ReportSummary,
        records: &[ArchiveRecord],
        generated_at: String,
        sample_size: usize,
    ) -> Self {
        Self {
            request: request.clone(),
            summary: summary.clone(),
            total_records: records.len(),
            generated_at,
            requested_by: request.requested_by.clone(),
            sample_data: records.iter().take(sample_size).cloned().collect(),
        }
    }
}

/// Writes report audits to a dedicated collection
#[derive(Clone)]
pub struct ReportPersister {
    store: Arc<dyn DocumentStore>,
    collection: String,
    sample_size: usize,
}

impl ReportPersister {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>, sample_size: usize) -> Self {
        Self {
            store,
            collection: collection.into(),
            sample_size,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Persist one audit record and return its id
    pub async fn persist(
        &self,
        request: &ArchiveReportRequest,
        summary: &ReportSummary,
        records: &[ArchiveRecord],
        generated_at: &str,
    ) -> ArchiveResult<String> {
        let audit = GeneratedReportAudit::new(
            request,
            summary,
            records,
            generated_at.to_string(),
            self.sample_size,
        );

        let fields = match serde_json::to_value(&audit) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ArchiveError::PersistFailed("audit is not an object".to_string())),
            Err(e) => return Err(ArchiveError::PersistFailed(e.to_string())),
        };

        let id = self
            .store
            .add(&self.collection, fields)
            .await
            .map_err(|e| ArchiveError::PersistFailed(e.to_string()))?;

        tracing::info!(
            report_id = %id,
            requested_by = %request.requested_by,
            total_records = records.len(),
            "Persisted report audit"
        );

        Ok(id)
    }
}
