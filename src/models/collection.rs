use crate::state::Filter;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Collection holding preventive-maintenance plans
pub const PM_PLANS: &str = "pm_plans";

/// Source collections that feed archive reports and searches
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CollectionKind {
    MaintenanceTasks,
    WorkOrders,
    IssueLogs,
    InspectionRecords,
}

/// Normalized category stamped on every archive record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordType {
    Maintenance,
    WorkOrder,
    Issue,
    Inspection,
}

/// How a collection marks a record as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalFilter {
    /// A boolean field that must be `true`
    Flag(&'static str),
    /// `status` must be one of these values
    Status(&'static [&'static str]),
}

impl TerminalFilter {
    pub fn to_filter(self) -> Filter {
        match self {
            TerminalFilter::Flag(field) => Filter::eq(field, true),
            TerminalFilter::Status([single]) => Filter::eq("status", *single),
            TerminalFilter::Status(values) => Filter::is_in("status", values.iter().copied()),
        }
    }
}

/// Static description of one source collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    pub kind: CollectionKind,
    pub record_type: RecordType,
    /// Field holding the completion instant
    pub completion_field: &'static str,
    pub terminal: TerminalFilter,
}

static COLLECTION_SPECS: [CollectionSpec; 4] = [
    CollectionSpec {
        kind: CollectionKind::MaintenanceTasks,
        record_type: RecordType::Maintenance,
        completion_field: "completedAt",
        terminal: TerminalFilter::Flag("archived"),
    },
    CollectionSpec {
        kind: CollectionKind::WorkOrders,
        record_type: RecordType::WorkOrder,
        completion_field: "completedAt",
        terminal: TerminalFilter::Status(&["Completed", "Closed", "Cancelled"]),
    },
    CollectionSpec {
        kind: CollectionKind::IssueLogs,
        record_type: RecordType::Issue,
        completion_field: "resolutionDate",
        terminal: TerminalFilter::Status(&["Resolved", "Closed"]),
    },
    CollectionSpec {
        kind: CollectionKind::InspectionRecords,
        record_type: RecordType::Inspection,
        completion_field: "completedAt",
        terminal: TerminalFilter::Status(&["Completed"]),
    },
];

impl CollectionKind {
    /// All source collections, in report order
    pub fn all() -> Vec<CollectionKind> {
        CollectionKind::iter().collect()
    }

    pub fn spec(self) -> &'static CollectionSpec {
        // Table order follows declaration order
        &COLLECTION_SPECS[self as usize]
    }

    pub fn record_type(self) -> RecordType {
        self.spec().record_type
    }

    pub fn completion_field(self) -> &'static str {
        self.spec().completion_field
    }
}
