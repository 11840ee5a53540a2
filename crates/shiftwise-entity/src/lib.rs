//! Domain entity models for Shiftwise.

pub mod store;
pub mod task;
