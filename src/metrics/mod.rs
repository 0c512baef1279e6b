//! Prometheus metrics for archive reporting and search.
//!
//! Counters are updated from the archive pipeline regardless of whether the
//! exporter is enabled; `init_metrics` only registers them for `/metrics`.
//!
//! # Example
//! ```no_run
//! use facility_archive::metrics::ARCHIVE_REPORTS_TOTAL;
//!
//! ARCHIVE_REPORTS_TOTAL.with_label_values(&["all", "success"]).inc();
//! ```
use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry};

const NAMESPACE: &str = "facility_archive";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Archive reports generated
    ///
    /// Labels: report_type, outcome
    pub static ref ARCHIVE_REPORTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("archive_reports_total", "Total number of archive reports generated")
            .namespace(NAMESPACE),
        &["report_type", "outcome"]
    ).expect("Failed to create ARCHIVE_REPORTS_TOTAL metric");

    /// Records returned by collection fetches
    ///
    /// Labels: collection
    pub static ref ARCHIVE_RECORDS_FETCHED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("archive_records_fetched_total", "Total number of archive records fetched")
            .namespace(NAMESPACE),
        &["collection"]
    ).expect("Failed to create ARCHIVE_RECORDS_FETCHED_TOTAL metric");

    /// Collection fetches that failed and were degraded to empty results
    ///
    /// Labels: collection
    pub static ref ARCHIVE_FETCH_FAILURES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("archive_fetch_failures_total", "Total number of failed collection fetches")
            .namespace(NAMESPACE),
        &["collection"]
    ).expect("Failed to create ARCHIVE_FETCH_FAILURES_TOTAL metric");

    /// Advanced search duration in seconds
    pub static ref ARCHIVE_SEARCH_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "archive_search_duration_seconds",
            "Advanced archive search duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])
    ).expect("Failed to create ARCHIVE_SEARCH_DURATION_SECONDS metric");
}

fn register<C: Collector + Clone + 'static>(collector: &C) -> Result<(), prometheus::Error> {
    match PROMETHEUS_REGISTRY.register(Box::new(collector.clone())) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Register all metrics with the global registry. Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(&*ARCHIVE_REPORTS_TOTAL)?;
    register(&*ARCHIVE_RECORDS_FETCHED_TOTAL)?;
    register(&*ARCHIVE_FETCH_FAILURES_TOTAL)?;
    register(&*ARCHIVE_SEARCH_DURATION_SECONDS)?;

    tracing::debug!("Archive metrics registered");
    Ok(())
}

/// Export all registered metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
