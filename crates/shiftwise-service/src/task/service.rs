//! Task lifecycle operations over the ledger.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use shiftwise_core::config::task::TaskConfig;
use shiftwise_core::error::{AppError, ErrorKind};
use shiftwise_core::result::AppResult;
use shiftwise_core::types::TaskId;
use shiftwise_database::TaskLedger;
use shiftwise_entity::task::{Task, TaskStatus};

/// Business operations over the task ledger: admission, progress
/// checkpoints, terminal writes, and polling reads.
///
/// Writes are plain load-modify-store with no row guard; concurrent
/// writers for the same task race with last-write-wins, which the design
/// accepts because a task is only ever mutated by the single worker
/// executing it.
#[derive(Debug)]
pub struct TaskService {
    ledger: Arc<dyn TaskLedger>,
    retention: Duration,
}

impl TaskService {
    /// Create a new task service.
    pub fn new(ledger: Arc<dyn TaskLedger>, config: &TaskConfig) -> Self {
        Self {
            ledger,
            retention: Duration::hours(config.retention_hours as i64),
        }
    }

    /// Admit a new task: serialize the request snapshot and persist an
    /// IN_PROGRESS record. The record must be committed before the work
    /// is dispatched so polling clients can immediately resolve the id.
    ///
    /// The retention window is fixed here, at creation; a task that runs
    /// longer than the window can expire before its result is ever read.
    pub async fn create_task<P>(
        &self,
        task_type: &str,
        requester_id: i64,
        payload: &P,
    ) -> AppResult<Task>
    where
        P: Serialize + ?Sized,
    {
        let request_payload = serde_json::to_string(payload).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to create task", e)
        })?;

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            task_type: task_type.to_string(),
            requester_id,
            request_payload: Some(request_payload),
            result_payload: None,
            error_message: None,
            status: TaskStatus::InProgress,
            progress: 0,
            started_at: now,
            completed_at: None,
            expires_at: now + self.retention,
            created_at: now,
            updated_at: now,
        };

        self.ledger.insert(&task).await?;
        info!(task_id = %task.id, task_type, requester_id, "Task created");
        Ok(task)
    }

    /// Record a progress checkpoint. Rejects values outside [0, 100]
    /// without touching the stored record.
    pub async fn update_progress(&self, id: &TaskId, percent: i32) -> AppResult<()> {
        let mut task = self.load(id).await?;
        if !(0..=100).contains(&percent) {
            return Err(AppError::validation(format!(
                "Progress must be between 0 and 100, got {percent}"
            )));
        }
        task.progress = percent;
        task.updated_at = Utc::now();
        self.ledger.update(&task).await
    }

    /// Set the task status, and when terminal stamp `completed_at` and
    /// store the serialized result.
    ///
    /// A result that fails to serialize is logged and dropped rather than
    /// surfaced: nobody is waiting on the runner, so the task still
    /// completes, just without a retrievable result.
    pub async fn update_status<R>(
        &self,
        id: &TaskId,
        status: TaskStatus,
        result: Option<&R>,
    ) -> AppResult<()>
    where
        R: Serialize,
    {
        let mut task = self.load(id).await?;
        let now = Utc::now();
        task.status = status;
        if status.is_terminal() {
            task.completed_at = Some(now);
        }
        if let Some(result) = result {
            match serde_json::to_string(result) {
                Ok(json) => task.result_payload = Some(json),
                Err(e) => warn!(
                    task_id = %id,
                    error = %e,
                    "Failed to serialize task result; completing without one"
                ),
            }
        }
        task.updated_at = now;
        self.ledger.update(&task).await
    }

    /// Force the task into FAILED with an error message. Unconditional:
    /// this can race with a concurrent `update_status` for the same task,
    /// in which case the last write wins.
    pub async fn set_error(&self, id: &TaskId, message: &str) -> AppResult<()> {
        let mut task = self.load(id).await?;
        let now = Utc::now();
        task.status = TaskStatus::Failed;
        task.completed_at = Some(now);
        task.error_message = Some(message.to_string());
        task.updated_at = now;
        self.ledger.update(&task).await
    }

    /// Read the current task record (status snapshot for polling).
    pub async fn get_task(&self, id: &TaskId) -> AppResult<Task> {
        self.load(id).await
    }

    /// Read the stored result.
    ///
    /// Any non-COMPLETED status yields the same "not completed" error,
    /// including FAILED and CANCELLED; a failed task's message is only
    /// visible through the status snapshot.
    pub async fn get_result(&self, id: &TaskId) -> AppResult<serde_json::Value> {
        let task = self.load(id).await?;
        if task.status != TaskStatus::Completed {
            return Err(AppError::validation("Task is not completed yet"));
        }
        let payload = task
            .result_payload
            .ok_or_else(|| AppError::serialization("Task result payload is missing"))?;
        serde_json::from_str(&payload).map_err(AppError::from)
    }

    async fn load(&self, id: &TaskId) -> AppResult<Task> {
        self.ledger
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Task '{id}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shiftwise_database::repositories::memory::MemoryTaskLedger;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskLedger::new()), &TaskConfig::default())
    }

    fn service_with_ledger() -> (TaskService, Arc<MemoryTaskLedger>) {
        let ledger = Arc::new(MemoryTaskLedger::new());
        let svc = TaskService::new(Arc::clone(&ledger) as Arc<dyn TaskLedger>, &TaskConfig::default());
        (svc, ledger)
    }

    #[tokio::test]
    async fn test_create_task_admits_in_progress_record() {
        let svc = service();
        let task = svc
            .create_task("STORE_CREATE", 1, &json!({"a": 1}))
            .await
            .expect("create");

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.progress, 0);
        assert!(task.completed_at.is_none());
        assert_eq!(task.expires_at, task.created_at + Duration::hours(24));
        assert_eq!(task.request_payload.as_deref(), Some(r#"{"a":1}"#));

        let read = svc.get_task(&task.id).await.expect("read back");
        assert_eq!(read.status, TaskStatus::InProgress);
        assert_eq!(read.progress, 0);
    }

    #[tokio::test]
    async fn test_update_progress_accepts_full_range() {
        let svc = service();
        let task = svc.create_task("X", 1, &json!({})).await.expect("create");

        for percent in [0, 50, 100] {
            svc.update_progress(&task.id, percent).await.expect("update");
            let read = svc.get_task(&task.id).await.expect("read");
            assert_eq!(read.progress, percent);
        }
    }

    #[tokio::test]
    async fn test_update_progress_rejects_out_of_range_and_keeps_stored_value() {
        let svc = service();
        let task = svc.create_task("X", 1, &json!({})).await.expect("create");
        svc.update_progress(&task.id, 50).await.expect("update");

        for percent in [-1, 101, 1000] {
            let err = svc
                .update_progress(&task.id, percent)
                .await
                .expect_err("out of range");
            assert_eq!(err.kind, ErrorKind::Validation);
        }

        let read = svc.get_task(&task.id).await.expect("read");
        assert_eq!(read.progress, 50);
    }

    #[tokio::test]
    async fn test_completed_at_set_iff_terminal() {
        let svc = service();
        let task = svc.create_task("X", 1, &json!({})).await.expect("create");
        assert!(svc.get_task(&task.id).await.expect("read").completed_at.is_none());

        svc.update_status(&task.id, TaskStatus::Completed, Some(&json!({"b": 2})))
            .await
            .expect("complete");
        let read = svc.get_task(&task.id).await.expect("read");
        assert_eq!(read.status, TaskStatus::Completed);
        assert!(read.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_result_roundtrip() {
        let svc = service();
        let task = svc.create_task("X", 1, &json!({"a": 1})).await.expect("create");

        let result = json!({"b": 2, "nested": {"list": [1, 2, 3]}});
        svc.update_status(&task.id, TaskStatus::Completed, Some(&result))
            .await
            .expect("complete");

        let read = svc.get_result(&task.id).await.expect("result");
        assert_eq!(read, result);
    }

    #[tokio::test]
    async fn test_get_result_not_ready_for_every_non_completed_status() {
        let svc = service();

        for status in [TaskStatus::InProgress, TaskStatus::Failed, TaskStatus::Cancelled] {
            let task = svc.create_task("X", 1, &json!({})).await.expect("create");
            if status != TaskStatus::InProgress {
                svc.update_status(&task.id, status, None::<&()>)
                    .await
                    .expect("status");
            }
            let err = svc.get_result(&task.id).await.expect_err("not ready");
            assert_eq!(err.kind, ErrorKind::Validation);
            assert_eq!(err.message, "Task is not completed yet");
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let svc = service();
        let id = TaskId::new();

        assert_eq!(
            svc.get_task(&id).await.expect_err("unknown").kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            svc.get_result(&id).await.expect_err("unknown").kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            svc.update_progress(&id, 10).await.expect_err("unknown").kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_set_error_forces_failed_and_result_stays_gated() {
        let svc = service();
        let task = svc.create_task("X", 1, &json!({})).await.expect("create");

        svc.set_error(&task.id, "boom").await.expect("set error");

        let read = svc.get_task(&task.id).await.expect("read");
        assert_eq!(read.status, TaskStatus::Failed);
        assert_eq!(read.error_message.as_deref(), Some("boom"));
        assert!(read.completed_at.is_some());

        // The result endpoint reports "not ready", not the error itself.
        let err = svc.get_result(&task.id).await.expect_err("not ready");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Task is not completed yet");
    }

    #[tokio::test]
    async fn test_completed_without_payload_is_a_serialization_error_on_read() {
        let (svc, ledger) = service_with_ledger();
        let task = svc.create_task("X", 1, &json!({})).await.expect("create");

        svc.update_status(&task.id, TaskStatus::Completed, None::<&()>)
            .await
            .expect("complete without result");

        let err = svc.get_result(&task.id).await.expect_err("missing payload");
        assert_eq!(err.kind, ErrorKind::Serialization);

        // Corrupt payloads surface the same kind.
        let mut row = ledger
            .find_by_id(&task.id)
            .await
            .expect("find")
            .expect("present");
        row.result_payload = Some("{not json".to_string());
        ledger.update(&row).await.expect("corrupt");
        let err = svc.get_result(&task.id).await.expect_err("corrupt payload");
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        let svc = service();
        let task = svc.create_task("X", 1, &json!({"a": 1})).await.expect("create");

        let read = svc.get_task(&task.id).await.expect("read");
        assert_eq!(read.status, TaskStatus::InProgress);
        assert_eq!(read.progress, 0);

        svc.update_progress(&task.id, 50).await.expect("progress");
        assert_eq!(svc.get_task(&task.id).await.expect("read").progress, 50);

        svc.update_status(&task.id, TaskStatus::Completed, Some(&json!({"b": 2})))
            .await
            .expect("complete");
        assert_eq!(svc.get_result(&task.id).await.expect("result"), json!({"b": 2}));
        assert!(svc.get_task(&task.id).await.expect("read").completed_at.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_progress_writes_land_on_one_of_the_values() {
        let svc = Arc::new(service());
        let task = svc.create_task("X", 1, &json!({})).await.expect("create");

        let a = {
            let svc = Arc::clone(&svc);
            let id = task.id.clone();
            tokio::spawn(async move { svc.update_progress(&id, 30).await })
        };
        let b = {
            let svc = Arc::clone(&svc);
            let id = task.id.clone();
            tokio::spawn(async move { svc.update_progress(&id, 70).await })
        };
        a.await.expect("join").expect("update");
        b.await.expect("join").expect("update");

        let progress = svc.get_task(&task.id).await.expect("read").progress;
        assert!(progress == 30 || progress == 70, "got {progress}");
    }
}
