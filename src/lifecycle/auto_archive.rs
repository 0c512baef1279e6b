use super::timestamp;
use crate::error::Result;
use crate::models::CollectionKind;
use crate::state::{DocumentStore, Filter, Query};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Flag completed maintenance tasks as archived.
///
/// Tasks already archived are left alone. An existing `completedAt` is kept;
/// otherwise it is set to `now`. Returns the number of tasks updated.
pub async fn archive_completed_tasks(store: &dyn DocumentStore, now: DateTime<Utc>) -> Result<usize> {
    let collection = CollectionKind::MaintenanceTasks.as_ref();
    let completion_field = CollectionKind::MaintenanceTasks.completion_field();

    let completed = store
        .query(collection, &Query::new().filter(Filter::eq("status", "Completed")))
        .await?;

    let mut archived = 0;
    for task in completed {
        if task.fields.get("archived").and_then(Value::as_bool) == Some(true) {
            continue;
        }

        let mut update = Map::new();
        update.insert("archived".to_string(), Value::Bool(true));
        update.insert("archivedAt".to_string(), timestamp(now));
        if task.fields.get(completion_field).map_or(true, Value::is_null) {
            update.insert(completion_field.to_string(), timestamp(now));
        }

        store.update(collection, &task.id, update).await?;
        debug!(task_id = %task.id, "Archived maintenance task");
        archived += 1;
    }

    info!(count = archived, "Auto-archive completed");
    Ok(archived)
}
