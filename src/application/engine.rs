use crate::domain::account::{Account, AccountId, Balance, Currency};
use crate::domain::event::{Event, WorkerId};
use crate::domain::ports::{ObserverRef, SubscriptionId};
use crate::domain::rate::CurrencyPair;
use crate::domain::transaction::TransactionRequest;
use crate::error::{BankError, Result};
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::rate_table::RateTable;
use crate::infrastructure::work_queue::WorkQueue;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::rate_updater::RateUpdater;
use super::worker::Worker;

/// Outcome of [`Engine::shutdown`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Workers cancelled after the wait budget ran out.
    pub forced: Vec<WorkerId>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.forced.is_empty()
    }
}

/// The processing core: owns ledger, rates, queue and bus, and drives the
/// worker pool plus the rate updater.
///
/// Construct once, `start` once, `shutdown` once; account and rate
/// operations are available the whole time. Transaction outcomes never
/// come back through `submit`; they arrive on the bus.
pub struct Engine {
    ledger: Arc<Ledger>,
    rates: Arc<RateTable>,
    queue: Arc<WorkQueue>,
    bus: Arc<EventBus>,
    workers: Mutex<Vec<(WorkerId, JoinHandle<()>)>>,
    updater: Mutex<Option<(watch::Sender<bool>, JoinHandle<()>)>>,
    started: AtomicBool,
    shut_down: AtomicBool,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(Ledger::new()),
            rates: Arc::new(RateTable::new()),
            queue: Arc::new(WorkQueue::new()),
            bus: Arc::new(EventBus::new()),
            workers: Mutex::new(Vec::new()),
            updater: Mutex::new(None),
            started: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn create_account(
        &self,
        id: AccountId,
        opening: Decimal,
        currency: Currency,
    ) -> Result<()> {
        self.ledger.create_account(id, opening, currency)
    }

    pub fn balance(&self, id: AccountId) -> Result<Balance> {
        self.ledger.balance(id)
    }

    pub fn currency(&self, id: AccountId) -> Result<Currency> {
        self.ledger.currency(id)
    }

    /// Point-in-time copy of every account, ordered by id.
    pub fn snapshot(&self) -> Vec<Account> {
        self.ledger.snapshot()
    }

    pub fn set_rate(&self, pair: CurrencyPair, rate: Decimal) -> Result<()> {
        self.rates.set(pair, rate)
    }

    pub fn rate(&self, pair: &CurrencyPair) -> Decimal {
        self.rates.get(pair)
    }

    pub fn subscribe(&self, observer: ObserverRef) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.bus.unsubscribe(id)
    }

    /// Spawns `worker_count` workers and the rate updater.
    pub fn start(&self, worker_count: usize, rate_interval: Duration) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(BankError::AlreadyStarted);
        }

        let mut workers = self.workers.lock();
        for id in 0..worker_count {
            let worker = Worker::new(
                id,
                Arc::clone(&self.queue),
                Arc::clone(&self.ledger),
                Arc::clone(&self.rates),
                Arc::clone(&self.bus),
            );
            workers.push((id, tokio::spawn(worker.run())));
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let updater = RateUpdater::new(
            Arc::clone(&self.rates),
            Arc::clone(&self.bus),
            rate_interval,
        );
        *self.updater.lock() = Some((stop_tx, tokio::spawn(updater.run(stop_rx))));

        tracing::info!("engine started with {worker_count} workers");
        Ok(())
    }

    /// Enqueues `request` and publishes a queued event. The outcome
    /// arrives later on the bus, never through this call.
    pub fn submit(&self, request: TransactionRequest) -> Result<()> {
        self.queue.submit(request.clone())?;
        self.bus.publish(&Event::Queued { request });
        Ok(())
    }

    /// Tears the engine down: stops the updater and waits for an in-flight
    /// pass, closes the queue, then waits up to `wait` for the workers to
    /// drain out, cancelling any that overrun. Publishes the final
    /// shut-down event and reports the cancelled workers.
    ///
    /// Only the first call tears down; later calls fail with
    /// [`BankError::ShutDown`].
    pub async fn shutdown(&self, wait: Duration) -> Result<ShutdownReport> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Err(BankError::ShutDown);
        }

        let updater = self.updater.lock().take();
        if let Some((stop_tx, handle)) = updater {
            // Receiver side may already be gone; either way the task stops.
            let _ = stop_tx.send(true);
            if let Err(err) = handle.await {
                tracing::warn!("rate updater join failed: {err}");
            }
        }

        self.queue.close();

        let workers = std::mem::take(&mut *self.workers.lock());
        let deadline = tokio::time::Instant::now() + wait;
        let mut forced = Vec::new();
        for (id, mut handle) in workers {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match timeout(remaining, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::warn!("worker {id} join failed: {err}"),
                Err(_) => {
                    handle.abort();
                    // Await the handle so the task is fully gone before the
                    // final event goes out; a worker inside a synchronous
                    // section still finishes its current request first.
                    if let Err(err) = handle.await
                        && !err.is_cancelled()
                    {
                        tracing::warn!("worker {id} join failed: {err}");
                    }
                    forced.push(id);
                }
            }
        }
        if !forced.is_empty() {
            tracing::warn!("forcibly cancelled workers: {forced:?}");
        }

        self.bus.publish(&Event::ShutDown);
        tracing::info!("engine shut down");
        Ok(ShutdownReport { forced })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
