//! Task tracking configuration.

use serde::{Deserialize, Serialize};

/// Async task record retention and cleanup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// How long a task record is retained, counted from creation time
    /// (not completion time).
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
    /// Cron expression for the daily sweep of expired terminal tasks.
    #[serde(default = "default_sweep_schedule")]
    pub sweep_schedule: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            retention_hours: default_retention_hours(),
            sweep_schedule: default_sweep_schedule(),
        }
    }
}

fn default_retention_hours() -> u64 {
    24
}

fn default_sweep_schedule() -> String {
    // Daily at 4 AM, process-local clock.
    "0 0 4 * * *".to_string()
}
