//! The bulk postpone operation: push every due date owned by one user
//! forward by exactly one day.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store;

pub const ONE_DAY_IN_MS: i64 = 24 * 60 * 60 * 1000;

/// Result of a successful postpone run. `task_ids` are the ids captured
/// before any mutation, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub updated: usize,
    pub task_ids: Vec<Uuid>,
}

/// Postpone all of `owner`'s tasks by one day. A task without a due date is
/// treated as due `now`; the caller captures `now` once so the whole batch
/// shares a single baseline. Returns `None` when the user has no tasks.
pub fn procrastinate(
    conn: &Connection,
    owner: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<Outcome>, StoreError> {
    let rows = store::due_dates(conn, owner)?;
    if rows.is_empty() {
        return Ok(None);
    }

    let task_ids: Vec<Uuid> = rows.iter().map(|(id, _)| *id).collect();
    let updates: Vec<(Uuid, DateTime<Utc>)> = rows
        .into_iter()
        .map(|(id, due)| (id, due.unwrap_or(now) + Duration::milliseconds(ONE_DAY_IN_MS)))
        .collect();

    let updated = store::bulk_update_due_dates(conn, &updates)?;
    Ok(Some(Outcome { updated, task_ids }))
}

/// Client-visible summary line, pluralized the way the API documents it.
pub fn message(updated: usize) -> String {
    format!(
        "Postponed {updated} task{} by one day.",
        if updated == 1 { "" } else { "s" }
    )
}
