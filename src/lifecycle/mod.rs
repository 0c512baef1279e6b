//! Record lifecycle operations
//!
//! Data logic behind the periodic housekeeping jobs: flagging completed
//! maintenance tasks as archived, creating tasks from weekly preventive
//! maintenance plans and purging old report audits. How the jobs are
//! triggered is up to the caller (the HTTP API exposes each one).

mod auto_archive;
mod retention;
mod weekly_tasks;

pub use auto_archive::archive_completed_tasks;
pub use retention::purge_generated_reports;
pub use weekly_tasks::{generate_weekly_tasks, WEEKLY_FREQUENCY};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

pub(crate) fn timestamp(instant: DateTime<Utc>) -> Value {
    Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
