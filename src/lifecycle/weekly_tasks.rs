use super::timestamp;
use crate::error::Result;
use crate::models::{CollectionKind, PM_PLANS};
use crate::state::{DocumentStore, Filter, Query};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Plan frequency that produces a task every week
pub const WEEKLY_FREQUENCY: &str = "weekly";

/// Plan fields carried over onto the generated task
const COPIED_FIELDS: [&str; 4] = ["title", "description", "assignedTo", "system"];

/// Create one pending maintenance task for every active weekly plan.
///
/// Each task is due seven days after `now`. Returns the new task ids.
pub async fn generate_weekly_tasks(store: &dyn DocumentStore, now: DateTime<Utc>) -> Result<Vec<String>> {
    let query = Query::new()
        .filter(Filter::eq("active", true))
        .filter(Filter::eq("frequency", WEEKLY_FREQUENCY));
    let plans = store.query(PM_PLANS, &query).await?;

    let mut created = Vec::with_capacity(plans.len());
    for plan in plans {
        let mut task = Map::new();
        for field in COPIED_FIELDS {
            if let Some(value) = plan.fields.get(field) {
                task.insert(field.to_string(), value.clone());
            }
        }
        task.insert("planId".to_string(), Value::String(plan.id.clone()));
        task.insert("status".to_string(), Value::String("Pending".to_string()));
        task.insert("archived".to_string(), Value::Bool(false));
        task.insert("createdAt".to_string(), timestamp(now));
        task.insert("dueDate".to_string(), timestamp(now + Duration::days(7)));

        let id = store.add(CollectionKind::MaintenanceTasks.as_ref(), task).await?;
        debug!(plan_id = %plan.id, task_id = %id, "Generated weekly task");
        created.push(id);
    }

    info!(count = created.len(), "Weekly task generation completed");
    Ok(created)
}
