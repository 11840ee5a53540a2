//! Cron scheduler for the daily expired-task sweep.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use shiftwise_core::error::AppError;
use shiftwise_database::TaskLedger;

/// Cron-based scheduler that purges expired terminal task records.
///
/// Runs at a fixed time of day on the process's own clock. Only
/// COMPLETED and FAILED rows past their retention window are removed;
/// IN_PROGRESS rows are never reclaimed (a stuck task stays forever) and
/// CANCELLED rows are skipped.
pub struct CleanupScheduler {
    scheduler: JobScheduler,
    ledger: Arc<dyn TaskLedger>,
    schedule: String,
}

impl std::fmt::Debug for CleanupScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupScheduler")
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl CleanupScheduler {
    /// Create a new cleanup scheduler.
    pub async fn new(ledger: Arc<dyn TaskLedger>, schedule: String) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            ledger,
            schedule,
        })
    }

    /// Register the sweep job.
    pub async fn register(&self) -> Result<(), AppError> {
        let ledger = Arc::clone(&self.ledger);
        let job = CronJob::new_async(self.schedule.as_str(), move |_uuid, _lock| {
            let ledger = Arc::clone(&ledger);
            Box::pin(async move {
                sweep(ledger.as_ref()).await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep schedule: {e}")))?;

        info!(schedule = %self.schedule, "Registered expired task sweep");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cleanup scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cleanup scheduler shut down");
        Ok(())
    }
}

/// Run one sweep pass.
///
/// A failed sweep is logged and swallowed so it never aborts future
/// scheduled passes.
pub async fn sweep(ledger: &dyn TaskLedger) {
    match ledger.delete_expired(Utc::now()).await {
        Ok(removed) => info!(removed, "Expired task sweep finished"),
        Err(e) => error!(error = %e, "Expired task sweep failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shiftwise_core::types::TaskId;
    use shiftwise_database::repositories::memory::MemoryTaskLedger;
    use shiftwise_entity::task::{Task, TaskStatus};

    fn task_with(status: TaskStatus, age_hours: i64) -> Task {
        let created = Utc::now() - Duration::hours(age_hours);
        Task {
            id: TaskId::new(),
            task_type: "TEST".to_string(),
            requester_id: 1,
            request_payload: None,
            result_payload: None,
            error_message: None,
            status,
            progress: 0,
            started_at: created,
            completed_at: status.is_terminal().then(Utc::now),
            expires_at: created + Duration::hours(24),
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_terminal_tasks() {
        let ledger = MemoryTaskLedger::new();

        let old_completed = task_with(TaskStatus::Completed, 48);
        let old_failed = task_with(TaskStatus::Failed, 48);
        let old_in_progress = task_with(TaskStatus::InProgress, 200);
        let recent_completed = task_with(TaskStatus::Completed, 1);

        for task in [
            &old_completed,
            &old_failed,
            &old_in_progress,
            &recent_completed,
        ] {
            ledger.insert(task).await.expect("insert");
        }

        sweep(&ledger).await;

        assert!(
            ledger
                .find_by_id(&old_completed.id)
                .await
                .expect("find")
                .is_none()
        );
        assert!(
            ledger
                .find_by_id(&old_failed.id)
                .await
                .expect("find")
                .is_none()
        );
        assert!(
            ledger
                .find_by_id(&old_in_progress.id)
                .await
                .expect("find")
                .is_some()
        );
        assert!(
            ledger
                .find_by_id(&recent_completed.id)
                .await
                .expect("find")
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_scheduler_registers_daily_schedule() {
        let ledger: Arc<dyn TaskLedger> = Arc::new(MemoryTaskLedger::new());
        let mut scheduler = CleanupScheduler::new(ledger, "0 0 4 * * *".to_string())
            .await
            .expect("scheduler");
        scheduler.register().await.expect("register");
        scheduler.shutdown().await.expect("shutdown");
    }
}
