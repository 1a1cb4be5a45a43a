//! Infrastructure layer: the concurrency-safe stores and channels the
//! application layer runs against. Every type here owns its own
//! synchronization; critical sections are short and never hold a lock
//! across an await point.

pub mod event_bus;
pub mod ledger;
pub mod rate_table;
pub mod work_queue;
