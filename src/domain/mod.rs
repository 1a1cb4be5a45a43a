//! Domain layer: the value types and contracts the rest of the crate is
//! built around. No synchronization lives here; locking is the
//! infrastructure layer's concern.

pub mod account;
pub mod event;
pub mod ports;
pub mod rate;
pub mod transaction;
