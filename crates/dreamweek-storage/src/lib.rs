//! dreamweek-storage
//!
//! The document persistence port consumed by the scheduler, plus an
//! S3-backed implementation and an in-memory one.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;

pub use crate::error::StorageError;
pub use crate::memory::MemoryStore;
pub use crate::s3::S3Store;
pub use crate::store::{BoxFuture, GoalStore};
