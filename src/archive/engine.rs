//! Archive report aggregation

use crate::archive::error::ArchiveResult;
use crate::archive::fetchers::CollectionFetcher;
use crate::archive::persist::ReportPersister;
use crate::archive::reports::{ArchiveReportRequest, ArchiveReportResponse};
use crate::archive::summary::ReportSummary;
use crate::archive::window::FetchCriteria;
use crate::config::ArchiveConfig;
use crate::metrics::ARCHIVE_REPORTS_TOTAL;
use crate::models::sort_newest_first;
use crate::state::DocumentStore;
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use std::sync::Arc;

/// Generates archive reports over the source collections
#[derive(Clone)]
pub struct ArchiveReportService {
    store: Arc<dyn DocumentStore>,
    persister: ReportPersister,
    config: ArchiveConfig,
}

impl ArchiveReportService {
    pub fn new(store: Arc<dyn DocumentStore>, config: ArchiveConfig) -> Self {
        let persister = ReportPersister::new(
            store.clone(),
            config.audit_collection.clone(),
            config.audit_sample_size,
        );

        Self {
            store,
            persister,
            config,
        }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Generate a report. Never fails: errors outside the per-collection
    /// fetches are returned as a `success: false` response.
    pub async fn generate_archive_report(
        &self,
        request: &ArchiveReportRequest,
    ) -> ArchiveReportResponse {
        let report_type = request.report_type.to_string();

        match self.try_generate(request).await {
            Ok(response) => {
                ARCHIVE_REPORTS_TOTAL
                    .with_label_values(&[report_type.as_str(), "success"])
                    .inc();
                response
            }
            Err(e) => {
                ARCHIVE_REPORTS_TOTAL
                    .with_label_values(&[report_type.as_str(), "failure"])
                    .inc();
                tracing::error!(
                    report_type = %report_type,
                    requested_by = %request.requested_by,
                    error = %e,
                    "Archive report generation failed"
                );
                ArchiveReportResponse::failure(e.to_string())
            }
        }
    }

    async fn try_generate(&self, request: &ArchiveReportRequest) -> ArchiveResult<ArchiveReportResponse> {
        let criteria = FetchCriteria::from_request(request)?;

        tracing::info!(
            report_type = %request.report_type,
            requested_by = %request.requested_by,
            "Generating archive report"
        );

        let fetchers: Vec<CollectionFetcher> = request
            .report_type
            .collections()
            .into_iter()
            .map(|kind| CollectionFetcher::new(kind, self.config.report_collection_limit))
            .collect();

        let store = self.store.as_ref();
        let batches = join_all(fetchers.iter().map(|f| f.fetch(store, &criteria))).await;

        let mut records: Vec<_> = batches.into_iter().flatten().collect();
        sort_newest_first(&mut records);

        let summary = ReportSummary::compute(&records, request);
        let generated_at = Utc::now();
        let generated_at_text = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let report_id = self
            .persister
            .persist(request, &summary, &records, &generated_at_text)
            .await?;

        tracing::info!(
            report_id = %report_id,
            count = records.len(),
            "Archive report generated"
        );

        Ok(ArchiveReportResponse::success(
            records,
            summary,
            report_id,
            generated_at,
        ))
    }
}
