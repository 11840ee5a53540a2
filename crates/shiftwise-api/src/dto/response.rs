//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shiftwise_core::types::TaskId;
use shiftwise_entity::store::Store;
use shiftwise_entity::task::{Task, TaskStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Task status snapshot returned by the polling endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    /// Task id.
    pub task_id: TaskId,
    /// Task type tag.
    pub task_type: String,
    /// Current status.
    pub status: TaskStatus,
    /// Progress in [0, 100].
    pub progress: i32,
    /// Error message, present only for failed tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When execution was admitted.
    pub started_at: DateTime<Utc>,
    /// When the task reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskStatusResponse {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.id,
            task_type: task.task_type,
            status: task.status,
            progress: task.progress,
            error_message: task.error_message,
            started_at: task.started_at,
            completed_at: task.completed_at,
            created_at: task.created_at,
        }
    }
}

/// 202 body returned by async endpoint variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAcceptedResponse {
    /// Id to poll.
    pub task_id: TaskId,
    /// Always IN_PROGRESS at admission.
    pub status: TaskStatus,
    /// Task type tag.
    pub task_type: String,
    /// Always 0 at admission.
    pub progress: i32,
}

impl From<Task> for TaskAcceptedResponse {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.id,
            status: task.status,
            task_type: task.task_type,
            progress: task.progress,
        }
    }
}

/// Store summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    /// Store id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// IANA timezone.
    pub timezone: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            timezone: store.timezone,
            created_at: store.created_at,
        }
    }
}

/// Health probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}
