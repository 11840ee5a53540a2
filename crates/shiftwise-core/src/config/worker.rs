//! Worker pool configuration.

use serde::{Deserialize, Serialize};

/// Sizing for a single worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of resident workers.
    pub core_workers: usize,
    /// Maximum concurrent workers (resident + burst).
    pub max_workers: usize,
    /// Bounded queue capacity; a full queue triggers burst workers,
    /// then caller-runs execution.
    pub queue_capacity: usize,
}

/// Configuration for both process-wide worker pools.
///
/// The database-bound pool must stay well below the database connection
/// pool's `max_connections`, otherwise async workers starve synchronous
/// request handling of connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Pool for work that does not hold a database connection.
    #[serde(default = "default_general_pool")]
    pub general: PoolConfig,
    /// Pool for database-bound work; sized to 50-70% of the
    /// database connection pool.
    #[serde(default = "default_database_pool")]
    pub database: PoolConfig,
    /// How long to wait for in-flight work when shutting down.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            general: default_general_pool(),
            database: default_database_pool(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

fn default_general_pool() -> PoolConfig {
    PoolConfig {
        core_workers: 10,
        max_workers: 50,
        queue_capacity: 500,
    }
}

fn default_database_pool() -> PoolConfig {
    PoolConfig {
        core_workers: 5,
        max_workers: 7,
        queue_capacity: 100,
    }
}

fn default_shutdown_grace() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_sizing() {
        let config = WorkerConfig::default();
        assert_eq!(config.general.core_workers, 10);
        assert_eq!(config.general.max_workers, 50);
        assert_eq!(config.general.queue_capacity, 500);
        assert_eq!(config.database.core_workers, 5);
        assert_eq!(config.database.max_workers, 7);
        assert_eq!(config.database.queue_capacity, 100);
        assert_eq!(config.shutdown_grace_seconds, 60);
    }
}
