//! Store domain entities.

pub mod model;

pub use model::Store;
