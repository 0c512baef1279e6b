use crate::error::Result;
use crate::models::parse_instant;
use crate::state::DocumentStore;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

/// Delete report audits generated before `now - retention`.
///
/// Audits without a readable `generatedAt` are kept. Returns the number deleted.
pub async fn purge_generated_reports(
    store: &dyn DocumentStore,
    collection: &str,
    retention: Duration,
    now: DateTime<Utc>,
) -> Result<usize> {
    let cutoff = now - retention;

    let mut expired = Vec::new();
    for audit in store.fetch_all(collection).await? {
        match audit.fields.get("generatedAt").and_then(parse_instant) {
            Some(generated_at) if generated_at < cutoff => expired.push(audit.id),
            Some(_) => {}
            None => warn!(report_id = %audit.id, "Report audit has no generatedAt, keeping it"),
        }
    }

    if expired.is_empty() {
        return Ok(0);
    }

    let deleted = store.batch_delete(collection, &expired).await?;
    info!(collection, count = deleted, cutoff = %cutoff, "Purged generated reports");
    Ok(deleted)
}
