//! Archive reporting and search over terminal-state facility records
//!
//! Work orders, maintenance tasks, issue logs and inspection records that have
//! reached a terminal status are pulled from the document store, tagged with
//! their origin, merged newest-first and summarized.
//!
//! # Pipeline
//!
//! - **Fetchers**: one per source collection, each applying that collection's
//!   terminal filter plus the requested date range and status. A failing
//!   collection yields no records instead of failing the report.
//! - **Engine**: fans out to the fetchers, sorts, summarizes and persists an
//!   audit record. Always returns an [`ArchiveReportResponse`].
//! - **Search**: concurrent multi-collection query with a keyword scan and no
//!   persistence.
//! - **Export**: CSV serialization of any record set.
//!
//! # Example
//!
//! ```no_run
//! use facility_archive::archive::{ArchiveReportRequest, ArchiveReportService, ReportType};
//! use facility_archive::config::ArchiveConfig;
//! use facility_archive::state::create_in_memory_store;
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = ArchiveReportService::new(create_in_memory_store(), ArchiveConfig::default());
//!
//!     let request = ArchiveReportRequest::new(ReportType::WorkOrders, "facilities@example.com")
//!         .with_date_range("2024-01-01", "2024-01-31");
//!
//!     let response = service.generate_archive_report(&request).await;
//!     println!("{} records", response.record_count);
//! }
//! ```

mod engine;
mod error;
mod export;
mod fetchers;
mod persist;
mod reports;
mod search;
mod summary;
mod window;

pub use engine::ArchiveReportService;
pub use error::{ArchiveError, ArchiveResult};
pub use export::{convert_to_csv, CsvExporter};
pub use fetchers::CollectionFetcher;
pub use persist::{GeneratedReportAudit, ReportPersister};
pub use reports::{ArchiveReportRequest, ArchiveReportResponse, ReportFormat, ReportType};
pub use search::{ArchiveSearch, SearchParams, SearchResults, SourceError};
pub use summary::{DateRangeEcho, ReportSummary, UNKNOWN_MONTH, UNSPECIFIED};
pub use window::{DateWindow, FetchCriteria};
