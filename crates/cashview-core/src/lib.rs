//! cashview-core
//!
//! Report builders, aggregation and record services for cashview.
//! Depends on cashview-domain. No CLI, no terminal I/O; persistence is reached
//! only through the store traits in [`store`].

pub mod aggregation_service;
pub mod buckets;
pub mod budget_service;
pub mod cash_flow_service;
pub mod error;
pub mod memory_store;
pub mod params;
pub mod period;
pub mod ratio;
pub mod record_service;
pub mod savings_service;
pub mod store;
pub mod summary_service;
pub mod time;

pub use aggregation_service::*;
pub use buckets::TimeBucketer;
pub use budget_service::*;
pub use cash_flow_service::*;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use memory_store::MemoryStore;
pub use params::{parse_months, MAX_TRAILING_MONTHS};
pub use period::PeriodResolver;
pub use record_service::*;
pub use savings_service::*;
pub use store::{BudgetStore, GroupKey, GroupTotal, GroupValue, RecordStore, TransactionStore};
pub use summary_service::*;
pub use time::{Clock, FixedClock};
