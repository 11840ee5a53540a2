//! Core building blocks shared by every Shiftwise crate: the unified
//! error type, configuration schemas, and identifier newtypes.

pub mod config;
pub mod error;
pub mod result;
pub mod types;
