//! Application state shared across all handlers.

use std::sync::Arc;

use shiftwise_core::config::AppConfig;
use shiftwise_service::{StoreService, TaskService};
use shiftwise_worker::TaskRunner;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks; the worker pools behind
/// the runner are constructed once in the composition root and threaded
/// through here explicitly.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Task tracking service.
    pub tasks: Arc<TaskService>,
    /// Store management service.
    pub stores: Arc<StoreService>,
    /// Async work runner (database-bound pool).
    pub runner: Arc<TaskRunner>,
}
