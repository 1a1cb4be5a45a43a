use crate::domain::account::Amount;
use crate::domain::event::{Event, WorkerId};
use crate::domain::rate::CurrencyPair;
use crate::domain::transaction::TransactionRequest;
use crate::error::{BankError, Result};
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::rate_table::RateTable;
use crate::infrastructure::work_queue::WorkQueue;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// One member of the processing pool.
///
/// Loops take, apply, publish until the queue closes. Every per-request
/// failure, panics included, becomes a `Declined` event; nothing stops the
/// loop short of queue shutdown.
pub struct Worker {
    id: WorkerId,
    queue: Arc<WorkQueue>,
    ledger: Arc<Ledger>,
    rates: Arc<RateTable>,
    bus: Arc<EventBus>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        queue: Arc<WorkQueue>,
        ledger: Arc<Ledger>,
        rates: Arc<RateTable>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            id,
            queue,
            ledger,
            rates,
            bus,
        }
    }

    /// Drains the queue until it closes, publishing one event per request.
    pub async fn run(self) {
        tracing::debug!("worker {} started", self.id);
        while let Some(request) = self.queue.take().await {
            let event = self.process(request);
            self.bus.publish(&event);
        }
        tracing::debug!("worker {} stopped", self.id);
    }

    /// Applies one request, converting any failure into a decline.
    fn process(&self, request: TransactionRequest) -> Event {
        // apply() has no await points, so unwinds cannot cross a
        // suspension and are safe to catch here.
        match catch_unwind(AssertUnwindSafe(|| self.apply(&request))) {
            Ok(Ok(event)) => event,
            Ok(Err(reason)) => Event::Declined {
                worker: self.id,
                request,
                reason,
            },
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("worker {} caught panic: {message}", self.id);
                Event::Declined {
                    worker: self.id,
                    request,
                    reason: BankError::Internal(message),
                }
            }
        }
    }

    fn apply(&self, request: &TransactionRequest) -> Result<Event> {
        match request {
            TransactionRequest::Deposit { account, amount } => {
                let amount = Amount::new(*amount)?;
                let balance = self.ledger.deposit(*account, amount)?;
                Ok(Event::Deposited {
                    worker: self.id,
                    account: *account,
                    amount: amount.value(),
                    balance,
                })
            }
            TransactionRequest::Withdraw { account, amount } => {
                let amount = Amount::new(*amount)?;
                let balance = self.ledger.withdraw(*account, amount)?;
                Ok(Event::Withdrew {
                    worker: self.id,
                    account: *account,
                    amount: amount.value(),
                    balance,
                })
            }
            TransactionRequest::Transfer { from, to, amount } => {
                let amount = Amount::new(*amount)?;
                let (from_balance, to_balance) = self.ledger.transfer(*from, *to, amount)?;
                Ok(Event::Transferred {
                    worker: self.id,
                    from: *from,
                    to: *to,
                    amount: amount.value(),
                    from_balance,
                    to_balance,
                })
            }
            TransactionRequest::Exchange {
                account,
                amount,
                from_currency,
                to_currency,
            } => {
                let amount = Amount::new(*amount)?;
                let pair = CurrencyPair::new(from_currency.clone(), to_currency.clone());
                let rate = self.rates.get(&pair);
                let (converted, balance) = self.ledger.exchange(
                    *account,
                    amount,
                    from_currency,
                    to_currency.clone(),
                    rate,
                )?;
                Ok(Event::Exchanged {
                    worker: self.id,
                    account: *account,
                    amount: amount.value(),
                    converted,
                    from: from_currency.clone(),
                    to: to_currency.clone(),
                    balance,
                })
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
