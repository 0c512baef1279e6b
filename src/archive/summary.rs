//! Summary aggregation over a merged archive record set

use crate::archive::reports::ArchiveReportRequest;
use crate::models::ArchiveRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Month bucket for records without a completion instant
pub const UNKNOWN_MONTH: &str = "unknown";

/// Placeholder for an absent date bound
pub const UNSPECIFIED: &str = "unspecified";

/// Echo of the requested date bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRangeEcho {
    pub from: String,
    pub to: String,
}

/// Counts and totals for one generated report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_records: usize,
    pub by_type: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
    /// Keyed by `YYYY-MM` of the completion instant
    pub by_month: BTreeMap<String, u64>,
    /// Zero unless financials were requested
    pub total_cost: f64,
    /// Zero unless financials were requested
    pub average_cost: f64,
    pub date_range: DateRangeEcho,
}

impl ReportSummary {
    pub fn compute(records: &[ArchiveRecord], request: &ArchiveReportRequest) -> Self {
        let mut by_type = BTreeMap::new();
        let mut by_status = BTreeMap::new();
        let mut by_month = BTreeMap::new();

        for record in records {
            *by_type.entry(record.record_type.to_string()).or_insert(0u64) += 1;

            if let Some(status) = record.status() {
                *by_status.entry(status.to_string()).or_insert(0u64) += 1;
            }

            let month = record
                .completed_at()
                .map(|at| at.format("%Y-%m").to_string())
                .unwrap_or_else(|| UNKNOWN_MONTH.to_string());
            *by_month.entry(month).or_insert(0u64) += 1;
        }

        let (total_cost, average_cost) = if request.include_financials {
            let total: f64 = records.iter().map(ArchiveRecord::cost).sum();
            let average = if records.is_empty() {
                0.0
            } else {
                total / records.len() as f64
            };
            (round2(total), round2(average))
        } else {
            (0.0, 0.0)
        };

        Self {
            total_records: records.len(),
            by_type,
            by_status,
            by_month,
            total_cost,
            average_cost,
            date_range: DateRangeEcho {
                from: echo(request.date_from.as_deref()),
                to: echo(request.date_to.as_deref()),
            },
        }
    }
}

fn echo(bound: Option<&str>) -> String {
    match bound.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNSPECIFIED.to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::reports::ReportType;
    use crate::models::CollectionKind;
    use crate::state::Document;
    use serde_json::{json, Value};

    fn record(kind: CollectionKind, fields: Value) -> ArchiveRecord {
        ArchiveRecord::from_document(
            Document::new(uuid::Uuid::new_v4().to_string(), fields.as_object().cloned().unwrap()),
            kind,
        )
    }

    fn sample() -> Vec<ArchiveRecord> {
        vec![
            record(
                CollectionKind::WorkOrders,
                json!({"status": "Completed", "completedAt": "2024-01-15T09:00:00Z", "cost": 50}),
            ),
            record(
                CollectionKind::WorkOrders,
                json!({"status": "Closed", "completedAt": "2024-01-20T09:00:00Z", "cost": "25.5"}),
            ),
            record(
                CollectionKind::IssueLogs,
                json!({"status": "Resolved", "resolutionDate": "2024-02-01T00:00:00Z"}),
            ),
            record(CollectionKind::MaintenanceTasks, json!({"archived": true})),
        ]
    }

    #[test]
    fn test_counts_by_type_status_and_month() {
        let request = ArchiveReportRequest::new(ReportType::All, "u1");
        let summary = ReportSummary::compute(&sample(), &request);

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.by_type["work_order"], 2);
        assert_eq!(summary.by_type["issue"], 1);
        assert_eq!(summary.by_type["maintenance"], 1);

        // The maintenance task has no status and is skipped
        assert_eq!(summary.by_status.values().sum::<u64>(), 3);

        assert_eq!(summary.by_month["2024-01"], 2);
        assert_eq!(summary.by_month["2024-02"], 1);
        assert_eq!(summary.by_month[UNKNOWN_MONTH], 1);
    }

    #[test]
    fn test_financials_only_when_requested() {
        let request = ArchiveReportRequest::new(ReportType::All, "u1");
        let summary = ReportSummary::compute(&sample(), &request);
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.average_cost, 0.0);

        let request = request.with_financials();
        let summary = ReportSummary::compute(&sample(), &request);
        assert_eq!(summary.total_cost, 75.5);
        assert_eq!(summary.average_cost, 18.88);
    }

    #[test]
    fn test_empty_set_has_zero_average() {
        let request = ArchiveReportRequest::new(ReportType::All, "u1").with_financials();
        let summary = ReportSummary::compute(&[], &request);

        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.average_cost, 0.0);
        assert!(summary.by_type.is_empty());
    }

    #[test]
    fn test_date_range_echo() {
        let request = ArchiveReportRequest::new(ReportType::All, "u1");
        let summary = ReportSummary::compute(&[], &request);
        assert_eq!(summary.date_range.from, UNSPECIFIED);
        assert_eq!(summary.date_range.to, UNSPECIFIED);

        let request = request.with_date_range("2024-01-01", "2024-01-31");
        let summary = ReportSummary::compute(&[], &request);
        assert_eq!(summary.date_range.from, "2024-01-01");
        assert_eq!(summary.date_range.to, "2024-01-31");
    }
}
