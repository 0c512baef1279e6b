//! Archive report request and response types

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::summary::ReportSummary;
use crate::models::{ArchiveRecord, CollectionKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which collections a report covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportType {
    All,
    #[serde(alias = "maintenance_tasks")]
    Maintenance,
    #[serde(alias = "work_order")]
    WorkOrders,
    #[serde(alias = "issue", alias = "issue_logs")]
    Issues,
    #[serde(alias = "inspection", alias = "inspection_records")]
    Inspections,
}

impl ReportType {
    /// Collections queried for this report type
    pub fn collections(self) -> Vec<CollectionKind> {
        match self {
            ReportType::All => CollectionKind::all(),
            ReportType::Maintenance => vec![CollectionKind::MaintenanceTasks],
            ReportType::WorkOrders => vec![CollectionKind::WorkOrders],
            ReportType::Issues => vec![CollectionKind::IssueLogs],
            ReportType::Inspections => vec![CollectionKind::InspectionRecords],
        }
    }
}

/// Output format requested by the caller
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl ReportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
        }
    }
}

/// Request for an archive report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReportRequest {
    pub report_type: ReportType,
    /// Inclusive start date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date_from: Option<String>,
    /// Inclusive end date (`YYYY-MM-DD`), covering the whole day
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub include_financials: bool,
    #[serde(default)]
    pub format: ReportFormat,
    pub requested_by: String,
}

impl ArchiveReportRequest {
    pub fn new(report_type: ReportType, requested_by: impl Into<String>) -> Self {
        Self {
            report_type,
            date_from: None,
            date_to: None,
            status: None,
            include_financials: false,
            format: ReportFormat::Json,
            requested_by: requested_by.into(),
        }
    }

    pub fn with_date_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = Some(from.into());
        self.date_to = Some(to.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_financials(mut self) -> Self {
        self.include_financials = true;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Reject requests that carry no requester
    pub fn check(&self) -> ArchiveResult<()> {
        if self.requested_by.trim().is_empty() {
            return Err(ArchiveError::InvalidRequest(
                "requestedBy must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Status equality filter, if one applies. `"all"` and blank mean none.
    pub fn status_filter(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
    }
}

/// Result of an archive report. Failures are reported in-band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ArchiveRecord>>,
    pub record_count: usize,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>,
    /// Id of the persisted audit document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArchiveReportResponse {
    pub fn success(
        records: Vec<ArchiveRecord>,
        summary: ReportSummary,
        report_id: String,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            success: true,
            record_count: records.len(),
            data: Some(records),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            summary: Some(summary),
            report_id: Some(report_id),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            record_count: 0,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            summary: None,
            report_id: None,
            error: Some(message.into()),
        }
    }
}
