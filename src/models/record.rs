use crate::models::{CollectionKind, RecordType};
use crate::state::Document;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the archive record itself rather than the source document
const RESERVED_KEYS: [&str; 3] = ["id", "collectionSource", "type"];

/// A terminal-state record fetched from one of the source collections,
/// tagged with its origin and normalized type.
///
/// Serializes flat: `{id, collectionSource, type, ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    pub id: String,
    pub collection_source: CollectionKind,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ArchiveRecord {
    /// Tag a stored document with its source collection and type
    pub fn from_document(document: Document, kind: CollectionKind) -> Self {
        let mut fields = document.fields;
        for key in RESERVED_KEYS {
            fields.remove(key);
        }

        Self {
            id: document.id,
            collection_source: kind,
            record_type: kind.record_type(),
            fields,
        }
    }

    /// Completion instant, read from the collection's own completion field
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.fields
            .get(self.collection_source.completion_field())
            .and_then(parse_instant)
    }

    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    /// Numeric cost; missing or non-numeric values count as zero
    pub fn cost(&self) -> f64 {
        match self.fields.get("cost") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Read a timestamp from a document field.
///
/// Accepts RFC 3339 strings, bare `YYYY-MM-DD` dates (midnight UTC),
/// epoch milliseconds, and `{seconds, nanoseconds}` timestamp objects.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos as u32).single()
        }
        _ => None,
    }
}

/// Sort newest-first by completion instant; records without one sort as the epoch
pub fn sort_newest_first(records: &mut [ArchiveRecord]) {
    records.sort_by_key(|record| {
        std::cmp::Reverse(record.completed_at().unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    });
}
