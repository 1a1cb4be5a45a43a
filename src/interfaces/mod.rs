//! Interface adapters between the core and the outside world: the log
//! observer feeding events to the tracing subscriber, and the writer
//! rendering final account state for the CLI.

pub mod log;
pub mod report;
