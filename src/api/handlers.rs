use crate::api::AppState;
use crate::archive::{
    convert_to_csv, ArchiveReportRequest, ReportFormat, SearchParams, SearchResults,
};
use crate::error::Result;
use crate::lifecycle;
use crate::metrics::gather_metrics;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Prometheus scrape endpoint
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

/// Generate an archive report.
///
/// Failed reports are returned with status 500 and the failure body.
/// Successful CSV reports are returned as a CSV attachment.
pub async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<ArchiveReportRequest>,
) -> Result<Response> {
    request.check()?;

    let response = state.reports.generate_archive_report(&request).await;

    if !response.success {
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response());
    }

    match (request.format, response.data.as_deref()) {
        (ReportFormat::Csv, Some(records)) => {
            let csv = convert_to_csv(records)?;
            let filename = format!(
                "attachment; filename=\"archive-report-{}.{}\"",
                response.report_id.as_deref().unwrap_or("export"),
                ReportFormat::Csv.extension()
            );

            Ok((
                [
                    (header::CONTENT_TYPE, ReportFormat::Csv.mime_type().to_string()),
                    (header::CONTENT_DISPOSITION, filename),
                ],
                csv,
            )
                .into_response())
        }
        _ => Ok(Json(response).into_response()),
    }
}

/// Advanced archive search
pub async fn search_archive(
    State(state): State<AppState>,
    Json(params): Json<SearchParams>,
) -> Result<Json<SearchResults>> {
    params.validate()?;

    let results = state.search.search(&params).await?;
    Ok(Json(results))
}

/// Convert a posted record array to CSV
pub async fn export_csv(Json(records): Json<Vec<Value>>) -> Result<Response> {
    let csv = convert_to_csv(&records)?;

    Ok((
        [(header::CONTENT_TYPE, ReportFormat::Csv.mime_type())],
        csv,
    )
        .into_response())
}

/// Delete report audits older than the retention period
pub async fn purge_reports(
    State(state): State<AppState>,
    Json(request): Json<PurgeReportsRequest>,
) -> Result<Json<PurgeReportsResponse>> {
    request.validate()?;

    let deleted = lifecycle::purge_generated_reports(
        state.store.as_ref(),
        &state.archive_config.audit_collection,
        Duration::days(request.retention_days),
        Utc::now(),
    )
    .await?;

    Ok(Json(PurgeReportsResponse { deleted }))
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReportsRequest {
    #[validate(range(min = 1, max = 3650))]
    pub retention_days: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeReportsResponse {
    pub deleted: usize,
}

/// Flag completed maintenance tasks as archived
pub async fn auto_archive(State(state): State<AppState>) -> Result<Json<AutoArchiveResponse>> {
    let archived = lifecycle::archive_completed_tasks(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(AutoArchiveResponse { archived }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutoArchiveResponse {
    pub archived: usize,
}

/// Create this week's tasks from active weekly plans
pub async fn weekly_tasks(State(state): State<AppState>) -> Result<Json<WeeklyTasksResponse>> {
    let created = lifecycle::generate_weekly_tasks(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(WeeklyTasksResponse { created }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyTasksResponse {
    pub created: Vec<String>,
}
