use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health and metrics
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        // Archive reporting
        .route("/v1/archive/reports", post(handlers::generate_report))
        .route("/v1/archive/reports/purge", post(handlers::purge_reports))
        .route("/v1/archive/search", post(handlers::search_archive))
        .route("/v1/archive/export/csv", post(handlers::export_csv))
        // Maintenance housekeeping
        .route("/v1/maintenance/auto-archive", post(handlers::auto_archive))
        .route("/v1/maintenance/weekly-tasks", post(handlers::weekly_tasks))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
