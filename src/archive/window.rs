//! Date-range and status criteria shared by the report fetchers and search

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::reports::ArchiveReportRequest;
use crate::models::CollectionSpec;
use crate::state::{Filter, Query};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Inclusive completion-instant window. `to` covers the whole end day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Build a window from calendar dates. Empty strings mean "no bound".
    pub fn parse(from: Option<&str>, to: Option<&str>) -> ArchiveResult<Self> {
        let from = non_empty(from).map(parse_day).transpose()?;
        let to = non_empty(to).map(parse_day).transpose()?;

        Ok(Self {
            from: from.map(start_of_day),
            to: to.map(|day| start_of_day(day) + Duration::days(1) - Duration::milliseconds(1)),
        })
    }

    /// Range filters on the given completion field
    pub fn filters(&self, field: &str) -> Vec<Filter> {
        let mut filters = Vec::with_capacity(2);
        if let Some(from) = self.from {
            filters.push(Filter::gte(field, format_instant(from)));
        }
        if let Some(to) = self.to {
            filters.push(Filter::lte(field, format_instant(to)));
        }
        filters
    }
}

/// Everything a collection fetch filters on besides the terminal status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchCriteria {
    pub window: DateWindow,
    /// Single status equality filter (reports)
    pub status: Option<String>,
    /// Status membership filter (search); ignored when empty
    pub statuses: Vec<String>,
}

impl FetchCriteria {
    pub fn from_request(request: &ArchiveReportRequest) -> ArchiveResult<Self> {
        Ok(Self {
            window: DateWindow::parse(request.date_from.as_deref(), request.date_to.as_deref())?,
            status: request.status_filter().map(str::to_string),
            statuses: Vec::new(),
        })
    }

    /// Build the store query for one collection.
    ///
    /// The terminal filter and the requested status are applied together, so a
    /// status outside the collection's terminal set matches nothing.
    pub fn query_for(&self, spec: &CollectionSpec, limit: usize) -> Query {
        let mut query = Query::new().filter(spec.terminal.to_filter());

        for filter in self.window.filters(spec.completion_field) {
            query = query.filter(filter);
        }
        if let Some(status) = &self.status {
            query = query.filter(Filter::eq("status", status.as_str()));
        }
        if !self.statuses.is_empty() {
            query = query.filter(Filter::is_in("status", self.statuses.iter().map(String::as_str)));
        }

        query.limit(limit)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_day(value: &str) -> ArchiveResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| ArchiveError::InvalidDate {
            value: value.to_string(),
        })
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
