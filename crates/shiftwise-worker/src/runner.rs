//! Async work runner — executes a business operation under task tracking.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use shiftwise_core::result::AppResult;
use shiftwise_core::types::TaskId;
use shiftwise_entity::task::TaskStatus;
use shiftwise_service::TaskService;

/// Progress checkpoint written when a worker picks the job up.
const PROGRESS_STARTED: i32 = 10;
/// Progress checkpoint written before the terminal status.
const PROGRESS_FINALIZING: i32 = 90;

/// Dispatches business operations onto the database-bound worker pool
/// and records their lifecycle in the task ledger.
///
/// The caller hands over an already-committed task id and gets control
/// back as soon as the job is enqueued; nothing ever awaits the outcome.
/// Failures inside the job therefore never propagate anywhere — they
/// become terminal ledger state and nothing else. There is no retry and
/// no heartbeat: a worker that dies mid-execution leaves its task
/// IN_PROGRESS forever.
#[derive(Debug)]
pub struct TaskRunner {
    tasks: Arc<TaskService>,
    pool: Arc<crate::pool::WorkerPool>,
}

impl TaskRunner {
    /// Create a new runner over the given pool.
    ///
    /// The pool should be the database-bound one: every checkpoint write
    /// and the operation itself acquire database connections, and the
    /// pool's sizing is what keeps those acquisitions from starving
    /// synchronous request handling.
    pub fn new(tasks: Arc<TaskService>, pool: Arc<crate::pool::WorkerPool>) -> Self {
        Self { tasks, pool }
    }

    /// Run `operation` asynchronously under the given task id.
    ///
    /// On success the result is serialized and stored with COMPLETED; on
    /// failure the task is marked FAILED and then the error message is
    /// recorded — two separate writes, so a crash in between leaves a
    /// FAILED task with no message.
    pub async fn dispatch<F, Fut, R>(&self, task_id: TaskId, operation: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<R>> + Send + 'static,
        R: Serialize + Send + Sync + 'static,
    {
        let tasks = Arc::clone(&self.tasks);
        self.pool
            .submit(async move {
                if let Err(e) = tasks.update_progress(&task_id, PROGRESS_STARTED).await {
                    warn!(task_id = %task_id, error = %e, "Failed to record start checkpoint");
                }

                match operation().await {
                    Ok(result) => {
                        if let Err(e) = tasks.update_progress(&task_id, PROGRESS_FINALIZING).await
                        {
                            warn!(task_id = %task_id, error = %e, "Failed to record finalize checkpoint");
                        }
                        match tasks
                            .update_status(&task_id, TaskStatus::Completed, Some(&result))
                            .await
                        {
                            Ok(()) => info!(task_id = %task_id, "Task completed"),
                            Err(e) => {
                                error!(task_id = %task_id, error = %e, "Failed to finalize task")
                            }
                        }
                    }
                    Err(err) => {
                        let message = err.to_string();
                        warn!(task_id = %task_id, error = %message, "Task operation failed");
                        if let Err(e) = tasks
                            .update_status(&task_id, TaskStatus::Failed, None::<&()>)
                            .await
                        {
                            error!(task_id = %task_id, error = %e, "Failed to mark task failed");
                        }
                        if let Err(e) = tasks.set_error(&task_id, &message).await {
                            error!(task_id = %task_id, error = %e, "Failed to record task error");
                        }
                    }
                }
            })
            .await;
    }
}
