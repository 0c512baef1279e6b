//! Query model shared by every document store backend

use crate::error::{AppError, Result};
use crate::state::Document;
use crate::models::parse_instant;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Largest membership list accepted by an `In` filter
pub const MAX_IN_LIST: usize = 10;

/// Comparison applied to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    In(Vec<Value>),
    Gte(Value),
    Lte(Value),
}

/// A filter on one named field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value.into()),
        }
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::In(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value.into()),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value.into()),
        }
    }

    /// Whether a document's fields satisfy this filter. Missing fields never match.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        let Some(actual) = fields.get(&self.field) else {
            return false;
        };

        match &self.op {
            FilterOp::Eq(expected) => compare_values(actual, expected) == Some(Ordering::Equal),
            FilterOp::In(options) => options
                .iter()
                .any(|option| compare_values(actual, option) == Some(Ordering::Equal)),
            FilterOp::Gte(bound) => matches!(
                compare_range(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lte(bound) => matches!(
                compare_range(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

/// Conjunctive set of filters with an optional result cap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject queries the hosted store would refuse
    pub fn validate(&self) -> Result<()> {
        for filter in &self.filters {
            if let FilterOp::In(values) = &filter.op {
                if values.len() > MAX_IN_LIST {
                    return Err(AppError::Validation(format!(
                        "'in' filter on '{}' has {} values, maximum is {}",
                        filter.field,
                        values.len(),
                        MAX_IN_LIST
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        self.filters.iter().all(|f| f.matches(fields))
    }

    /// Filter documents (already in id order) and apply the limit
    pub fn apply<I>(&self, documents: I) -> Vec<Document>
    where
        I: IntoIterator<Item = Document>,
    {
        let matching = documents.into_iter().filter(|doc| self.matches(&doc.fields));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

/// Type-aware ordering between two field values.
///
/// Returns `None` when the values are not comparable (different types).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_rfc3339(x), parse_rfc3339(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

/// Ordering of a field value against a range bound.
///
/// A timestamp bound compares the field as an instant, so bare dates, epoch
/// milliseconds and `{seconds, nanoseconds}` objects all land on the same axis.
fn compare_range(actual: &Value, bound: &Value) -> Option<Ordering> {
    match bound {
        Value::String(_) | Value::Object(_) => match parse_instant(bound) {
            Some(bound) => parse_instant(actual).map(|actual| actual.cmp(&bound)),
            None => compare_values(actual, bound),
        },
        _ => compare_values(actual, bound),
    }
}

fn parse_rfc3339(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
