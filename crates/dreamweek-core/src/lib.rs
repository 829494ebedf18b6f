//! dreamweek-core
//!
//! Pure domain types, ISO-week calendar arithmetic, and document key conventions.
//! No storage dependency; this is the shared vocabulary of the Dreamweek system.

pub mod calendar;
pub mod error;
pub mod keys;
pub mod models;

pub use calendar::WeekId;
