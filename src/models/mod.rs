//! Data models for the Smart Ping backend.

mod pagination;
mod summary;
mod update;

pub use pagination::*;
pub use summary::*;
pub use update::*;
