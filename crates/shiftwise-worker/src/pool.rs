//! Bounded worker pool with caller-runs backpressure.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, RwLock, Semaphore, mpsc};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use shiftwise_core::config::worker::PoolConfig;

type PoolJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A bounded pool of workers draining a job queue.
///
/// Admission order under load:
/// 1. enqueue for the resident (core) workers;
/// 2. queue full: run on a burst worker, up to `max_workers` total;
/// 3. burst slots exhausted: the submitter executes the job itself.
///
/// Jobs are never dropped or rejected. Both process-wide pools are
/// constructed once at startup and passed in explicitly wherever async
/// work is dispatched; there is no ambient/global pool lookup.
#[derive(Debug)]
pub struct WorkerPool {
    name: String,
    /// Taken on shutdown so workers drain the queue and exit.
    tx: RwLock<Option<mpsc::Sender<PoolJob>>>,
    /// Permits for burst workers beyond the resident ones.
    burst: Arc<Semaphore>,
    /// Tracks resident and burst workers for the shutdown drain.
    tracker: TaskTracker,
    /// Bounded wait for in-flight work on shutdown.
    grace: Duration,
}

impl WorkerPool {
    /// Create a pool and spawn its resident workers.
    pub fn new(name: impl Into<String>, config: &PoolConfig, grace: Duration) -> Self {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<PoolJob>(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let tracker = TaskTracker::new();
        for worker in 0..config.core_workers.max(1) {
            let rx = Arc::clone(&rx);
            let worker_name = name.clone();
            tracker.spawn(async move {
                loop {
                    let job = { rx.lock().await.recv().await };
                    match job {
                        Some(job) => job.await,
                        None => break,
                    }
                }
                debug!(pool = %worker_name, worker, "Pool worker exited");
            });
        }

        let burst_slots = config.max_workers.saturating_sub(config.core_workers);
        info!(
            pool = %name,
            core_workers = config.core_workers,
            max_workers = config.max_workers,
            queue_capacity = config.queue_capacity,
            "Worker pool started"
        );

        Self {
            name,
            tx: RwLock::new(Some(tx)),
            burst: Arc::new(Semaphore::new(burst_slots)),
            tracker,
            grace,
        }
    }

    /// Submit a job.
    ///
    /// Normally this only enqueues and returns immediately. Once the
    /// queue and all burst slots are exhausted, the submitting task runs
    /// the job inline, so under saturation this call does not return
    /// until the job has finished.
    pub async fn submit<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let job: PoolJob = Box::pin(fut);

        let Some(tx) = self.tx.read().await.clone() else {
            warn!(pool = %self.name, "Pool is shut down; running job on the submitter");
            job.await;
            return;
        };

        match tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => match Arc::clone(&self.burst).try_acquire_owned() {
                Ok(permit) => {
                    debug!(pool = %self.name, "Queue full; running job on a burst worker");
                    self.tracker.spawn(async move {
                        job.await;
                        drop(permit);
                    });
                }
                Err(_) => {
                    warn!(pool = %self.name, "Pool saturated; running job on the submitter");
                    job.await;
                }
            },
            Err(TrySendError::Closed(job)) => {
                warn!(pool = %self.name, "Pool is shutting down; running job on the submitter");
                job.await;
            }
        }
    }

    /// Stop intake and wait for queued plus in-flight work, up to the
    /// grace period. Work still running after that is abandoned to the
    /// runtime.
    pub async fn shutdown(&self) {
        self.tx.write().await.take();
        self.tracker.close();

        info!(pool = %self.name, grace_seconds = self.grace.as_secs(), "Draining worker pool");
        if tokio::time::timeout(self.grace, self.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                pool = %self.name,
                grace_seconds = self.grace.as_secs(),
                "Worker pool did not drain within the grace period"
            );
        } else {
            info!(pool = %self.name, "Worker pool drained");
        }
    }
}
