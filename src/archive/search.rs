//! Advanced multi-collection archive search

use crate::archive::error::ArchiveResult;
use crate::archive::fetchers::CollectionFetcher;
use crate::archive::window::{DateWindow, FetchCriteria};
use crate::config::ArchiveConfig;
use crate::metrics::{ARCHIVE_FETCH_FAILURES_TOTAL, ARCHIVE_SEARCH_DURATION_SECONDS};
use crate::models::{sort_newest_first, ArchiveRecord, CollectionKind};
use crate::state::DocumentStore;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Search parameters. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Collections to search; all four when absent or empty
    #[serde(default)]
    pub collections: Option<Vec<CollectionKind>>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub keywords: Option<String>,
    /// Per-collection result cap
    #[serde(default)]
    #[validate(range(min = 1, max = 5000))]
    pub limit: Option<usize>,
}

/// A collection that could not be searched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceError {
    pub collection: CollectionKind,
    pub message: String,
}

/// Merged search hits plus any per-collection failures
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub records: Vec<ArchiveRecord>,
    pub errors: Vec<SourceError>,
}

/// Read-only search over the archived collections
#[derive(Clone)]
pub struct ArchiveSearch {
    store: Arc<dyn DocumentStore>,
    config: ArchiveConfig,
}

impl ArchiveSearch {
    pub fn new(store: Arc<dyn DocumentStore>, config: ArchiveConfig) -> Self {
        Self { store, config }
    }

    /// Query the selected collections concurrently, keep records whose
    /// serialized form contains the keyword, and merge newest-first.
    ///
    /// Failing collections are reported in `errors` instead of failing the
    /// whole search. Only malformed dates are an error.
    pub async fn search(&self, params: &SearchParams) -> ArchiveResult<SearchResults> {
        let _timer = ARCHIVE_SEARCH_DURATION_SECONDS.start_timer();

        let criteria = FetchCriteria {
            window: DateWindow::parse(params.date_from.as_deref(), params.date_to.as_deref())?,
            status: None,
            statuses: self.status_list(&params.statuses),
        };

        let collections = match &params.collections {
            Some(selected) if !selected.is_empty() => selected.clone(),
            _ => CollectionKind::all(),
        };
        let limit = params.limit.unwrap_or(self.config.search_default_limit);

        let fetchers: Vec<CollectionFetcher> = collections
            .into_iter()
            .map(|kind| CollectionFetcher::new(kind, limit))
            .collect();

        let store = self.store.as_ref();
        let criteria = &criteria;
        let outcomes = join_all(
            fetchers
                .iter()
                .map(|f| async move { (f.kind(), f.try_fetch(store, criteria).await) }),
        )
        .await;

        let keyword = params
            .keywords
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);

        let mut results = SearchResults::default();
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(records) => results.records.extend(
                    records
                        .into_iter()
                        .filter(|record| keyword.as_deref().map_or(true, |k| contains_keyword(record, k))),
                ),
                Err(e) => {
                    ARCHIVE_FETCH_FAILURES_TOTAL
                        .with_label_values(&[kind.as_ref()])
                        .inc();
                    tracing::warn!(collection = %kind, error = %e, "Search skipped collection");
                    results.errors.push(SourceError {
                        collection: kind,
                        message: e.to_string(),
                    });
                }
            }
        }

        sort_newest_first(&mut results.records);

        tracing::info!(
            count = results.records.len(),
            failed_collections = results.errors.len(),
            "Archive search completed"
        );

        Ok(results)
    }

    fn status_list(&self, statuses: &[String]) -> Vec<String> {
        let cap = self.config.max_status_filter;
        if statuses.len() > cap {
            tracing::warn!(
                requested = statuses.len(),
                cap,
                "Status filter truncated"
            );
        }
        statuses.iter().take(cap).cloned().collect()
    }
}

/// Case-insensitive substring match over the whole serialized record
fn contains_keyword(record: &ArchiveRecord, keyword: &str) -> bool {
    serde_json::to_string(record)
        .map(|text| text.to_lowercase().contains(keyword))
        .unwrap_or(false)
}
