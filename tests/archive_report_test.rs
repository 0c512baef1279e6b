//! Integration tests for archive report generation

mod common;

use common::{seed, seeded_store, FailingStore};
use facility_archive::archive::{
    convert_to_csv, ArchiveReportRequest, ArchiveReportService, GeneratedReportAudit, ReportType,
};
use facility_archive::config::ArchiveConfig;
use facility_archive::models::RecordType;
use facility_archive::state::{DocumentStore, InMemoryStore};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn service(store: Arc<dyn DocumentStore>) -> ArchiveReportService {
    ArchiveReportService::new(store, ArchiveConfig::default())
}

#[tokio::test]
async fn test_january_work_order_report() {
    let store = Arc::new(InMemoryStore::new());
    seed(
        store.as_ref(),
        "work_orders",
        "wo-jan",
        json!({"status": "Completed", "completedAt": "2024-01-15T10:00:00Z", "cost": 50}),
    )
    .await;
    seed(
        store.as_ref(),
        "work_orders",
        "wo-feb",
        json!({"status": "Completed", "completedAt": "2024-02-01T10:00:00Z", "cost": 75}),
    )
    .await;

    let request: ArchiveReportRequest = serde_json::from_value(json!({
        "reportType": "work_orders",
        "dateFrom": "2024-01-01",
        "dateTo": "2024-01-31",
        "format": "json",
        "requestedBy": "u1"
    }))
    .unwrap();

    let response = service(store.clone()).generate_archive_report(&request).await;

    assert!(response.success);
    assert_eq!(response.record_count, 1);
    assert_eq!(response.data.as_ref().unwrap()[0].id, "wo-jan");

    let summary = response.summary.unwrap();
    assert_eq!(summary.by_type.len(), 1);
    assert_eq!(summary.by_type["work_order"], 1);
    assert_eq!(summary.date_range.from, "2024-01-01");
}

#[tokio::test]
async fn test_all_report_partitions_by_type() {
    let store = seeded_store().await;

    let response = service(store.clone())
        .generate_archive_report(&ArchiveReportRequest::new(ReportType::All, "u1"))
        .await;

    assert!(response.success);
    assert_eq!(response.record_count, 4);

    let types: HashSet<RecordType> = response
        .data
        .unwrap()
        .iter()
        .map(|record| {
            let expected = record.collection_source.record_type();
            assert_eq!(record.record_type, expected);
            record.record_type
        })
        .collect();

    assert_eq!(
        types,
        HashSet::from([
            RecordType::Maintenance,
            RecordType::WorkOrder,
            RecordType::Issue,
            RecordType::Inspection,
        ])
    );
}

#[tokio::test]
async fn test_results_sorted_newest_first_with_undated_last() {
    let store = seeded_store().await;
    seed(store.as_ref(), "work_orders", "wo-undated", json!({"status": "Cancelled"})).await;

    let response = service(store.clone())
        .generate_archive_report(&ArchiveReportRequest::new(ReportType::All, "u1"))
        .await;

    let ids: Vec<String> = response.data.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["in-1", "wo-1", "is-1", "mt-1", "wo-undated"]);
}

#[tokio::test]
async fn test_one_failing_collection_is_isolated() {
    let base = seeded_store().await;
    let store = Arc::new(FailingStore::new(base.clone()).fail_queries_on("issue_logs"));

    let response = service(store)
        .generate_archive_report(&ArchiveReportRequest::new(ReportType::All, "u1"))
        .await;

    assert!(response.success);
    assert_eq!(response.record_count, 3);
    assert!(response
        .data
        .unwrap()
        .iter()
        .all(|r| r.record_type != RecordType::Issue));
}

#[tokio::test]
async fn test_audit_record_keeps_ten_record_sample() {
    let store = Arc::new(InMemoryStore::new());
    for i in 0..15 {
        seed(
            store.as_ref(),
            "inspection_records",
            &format!("in-{:02}", i),
            json!({"status": "Completed", "completedAt": format!("2024-03-{:02}T00:00:00Z", i + 1)}),
        )
        .await;
    }

    let response = service(store.clone())
        .generate_archive_report(&ArchiveReportRequest::new(ReportType::Inspections, "auditor"))
        .await;
    assert!(response.success);
    assert_eq!(response.record_count, 15);

    let audits = store.fetch_all("generated_reports").await.unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(Some(audits[0].id.clone()), response.report_id);

    let audit: GeneratedReportAudit =
        serde_json::from_value(Value::Object(audits[0].fields.clone())).unwrap();
    assert_eq!(audit.total_records, 15);
    assert_eq!(audit.sample_data.len(), 10);
    assert_eq!(audit.requested_by, "auditor");
    assert_eq!(audit.generated_at, response.generated_at);
    // Sample is the head of the sorted result
    assert_eq!(audit.sample_data[0].id, "in-14");
}

#[tokio::test]
async fn test_persistence_failure_is_failure_response() {
    let base = seeded_store().await;
    let store = Arc::new(FailingStore::new(base.clone()).fail_writes());

    let response = service(store)
        .generate_archive_report(&ArchiveReportRequest::new(ReportType::All, "u1"))
        .await;

    assert!(!response.success);
    assert_eq!(response.record_count, 0);
    assert!(response.data.is_none());
    assert!(response.error.unwrap().contains("persist"));
}

#[tokio::test]
async fn test_financials_and_csv_export() {
    let store = seeded_store().await;

    let request = ArchiveReportRequest::new(ReportType::All, "u1").with_financials();
    let response = service(store.clone()).generate_archive_report(&request).await;

    let summary = response.summary.clone().unwrap();
    assert_eq!(summary.total_cost, 200.5);
    assert_eq!(summary.average_cost, 50.13);

    let csv = convert_to_csv(response.data.as_ref().unwrap()).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,collectionSource,type,"));
    assert!(header.contains("resolutionDate"));
    assert_eq!(lines.count(), 4);
}

#[tokio::test]
async fn test_conflicting_status_yields_empty_report() {
    let store = seeded_store().await;

    let request = ArchiveReportRequest::new(ReportType::WorkOrders, "u1").with_status("Open");
    let response = service(store.clone()).generate_archive_report(&request).await;

    assert!(response.success);
    assert_eq!(response.record_count, 0);
}

#[tokio::test]
async fn test_record_on_date_from_is_included() {
    let store = Arc::new(InMemoryStore::new());
    seed(store.as_ref(), "work_orders", "wo-bare", json!({"status": "Completed", "completedAt": "2024-01-01"})).await;
    seed(store.as_ref(), "work_orders", "wo-midnight", json!({"status": "Closed", "completedAt": "2024-01-01T00:00:00Z"})).await;
    seed(store.as_ref(), "work_orders", "wo-eve", json!({"status": "Closed", "completedAt": "2023-12-31T23:59:59.999Z"})).await;

    let request = ArchiveReportRequest::new(ReportType::WorkOrders, "u1")
        .with_date_range("2024-01-01", "2024-01-31");
    let response = service(store.clone()).generate_archive_report(&request).await;

    assert!(response.success);
    let ids: HashSet<String> = response.data.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, HashSet::from(["wo-bare".to_string(), "wo-midnight".to_string()]));
}

#[tokio::test]
async fn test_date_window_accepts_every_timestamp_form() {
    let store = Arc::new(InMemoryStore::new());
    seed(store.as_ref(), "work_orders", "wo-date", json!({"status": "Completed", "completedAt": "2024-01-31"})).await;
    seed(store.as_ref(), "work_orders", "wo-object", json!({"status": "Completed", "completedAt": {"seconds": 1705312800, "nanoseconds": 0}})).await;
    seed(store.as_ref(), "work_orders", "wo-millis", json!({"status": "Completed", "completedAt": 1705312800000_i64})).await;
    // 2024-02-01T00:00:00Z
    seed(store.as_ref(), "work_orders", "wo-february", json!({"status": "Completed", "completedAt": 1706745600000_i64})).await;

    let request = ArchiveReportRequest::new(ReportType::WorkOrders, "u1")
        .with_date_range("2024-01-01", "2024-01-31");
    let response = service(store.clone()).generate_archive_report(&request).await;

    assert!(response.success);
    assert_eq!(response.record_count, 3);
    let ids: HashSet<String> = response.data.unwrap().into_iter().map(|r| r.id).collect();
    assert!(!ids.contains("wo-february"));

    let summary = response.summary.unwrap();
    assert_eq!(summary.by_month.len(), 1);
    assert_eq!(summary.by_month["2024-01"], 3);
}
