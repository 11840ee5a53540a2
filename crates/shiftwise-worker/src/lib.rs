//! Async execution infrastructure for Shiftwise.
//!
//! This crate provides:
//! - Bounded worker pools with caller-runs backpressure
//! - The task runner that executes business operations under task tracking
//! - A cron scheduler for the daily expired-task sweep

pub mod pool;
pub mod runner;
pub mod sweeper;

pub use pool::WorkerPool;
pub use runner::TaskRunner;
pub use sweeper::CleanupScheduler;
