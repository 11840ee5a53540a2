//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shiftwise_core::types::TaskId;

use super::status::TaskStatus;

/// A tracked async task.
///
/// The record is created by the request-handling path before the work is
/// dispatched, mutated only by the worker executing the operation, read by
/// polling clients, and eventually deleted by the cleanup sweep. The row
/// carries no version counter; concurrent writers race with last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task identifier, generated at creation.
    pub id: TaskId,
    /// Task type tag (e.g., `"STORE_CREATE"`).
    pub task_type: String,
    /// Actor who submitted the task.
    pub requester_id: i64,
    /// Serialized request snapshot (opaque JSON text).
    pub request_payload: Option<String>,
    /// Serialized result snapshot (opaque JSON text), set on completion.
    pub result_payload: Option<String>,
    /// Error message, present only when the task failed.
    pub error_message: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Progress percentage in [0, 100].
    pub progress: i32,
    /// When execution was admitted.
    pub started_at: DateTime<Utc>,
    /// When the task reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the record becomes eligible for cleanup. Fixed at creation
    /// time (creation + retention window), independent of completion.
    pub expires_at: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the record is past its retention window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
