//! Application layer containing the processing core.
//!
//! The [`engine::Engine`] wires the infrastructure pieces together and
//! owns the running tasks: a pool of [`worker::Worker`]s draining the
//! queue and one [`rate_updater::RateUpdater`] on its own schedule.

pub mod engine;
pub mod rate_updater;
pub mod worker;
