//! cashview-domain
//!
//! Pure domain models (transactions, budgets, calendar helpers, report values).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod budget;
pub mod calendar;
pub mod records;
pub mod report;
pub mod transaction;

pub use budget::*;
pub use calendar::*;
pub use records::*;
pub use report::*;
pub use transaction::*;

/// Identifies the user owning a record. Every query is scoped by it.
pub type UserId = uuid::Uuid;

// Re-export common dependencies so consumers can rely on this crate as a façade.
pub use chrono;
pub use rust_decimal;
pub use uuid;
