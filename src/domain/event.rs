use crate::domain::account::{AccountId, Balance, Currency};
use crate::domain::rate::CurrencyPair;
use crate::domain::transaction::TransactionRequest;
use crate::error::BankError;
use rust_decimal::Decimal;
use std::fmt;

/// Identifies one worker within the pool.
pub type WorkerId = usize;

/// Notification published on the bus after every state change.
///
/// Observers receive the structured value; `Display` renders the plain-text
/// form used by the log observer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A request was accepted into the work queue.
    Queued { request: TransactionRequest },
    Deposited {
        worker: WorkerId,
        account: AccountId,
        amount: Decimal,
        balance: Balance,
    },
    Withdrew {
        worker: WorkerId,
        account: AccountId,
        amount: Decimal,
        balance: Balance,
    },
    Transferred {
        worker: WorkerId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        from_balance: Balance,
        to_balance: Balance,
    },
    Exchanged {
        worker: WorkerId,
        account: AccountId,
        amount: Decimal,
        converted: Decimal,
        from: Currency,
        to: Currency,
        balance: Balance,
    },
    /// A request ran to a well-defined unsuccessful outcome.
    Declined {
        worker: WorkerId,
        request: TransactionRequest,
        reason: BankError,
    },
    RateUpdated {
        pair: CurrencyPair,
        old: Decimal,
        new: Decimal,
    },
    /// Final event; nothing is published after it.
    ShutDown,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued { request } => write!(f, "queued {request}"),
            Self::Deposited {
                worker,
                account,
                amount,
                balance,
            } => write!(
                f,
                "worker {worker} deposited {amount} into account {account}, balance {balance}"
            ),
            Self::Withdrew {
                worker,
                account,
                amount,
                balance,
            } => write!(
                f,
                "worker {worker} withdrew {amount} from account {account}, balance {balance}"
            ),
            Self::Transferred {
                worker,
                from,
                to,
                amount,
                from_balance,
                to_balance,
            } => write!(
                f,
                "worker {worker} transferred {amount} from account {from} (balance {from_balance}) \
                 to account {to} (balance {to_balance})"
            ),
            Self::Exchanged {
                worker,
                account,
                amount,
                converted,
                from,
                to,
                balance,
            } => write!(
                f,
                "worker {worker} exchanged {amount} {from} into {converted} {to} \
                 for account {account}, balance {balance}"
            ),
            Self::Declined {
                worker,
                request,
                reason,
            } => write!(f, "worker {worker} declined {request}: {reason}"),
            Self::RateUpdated { pair, old, new } => {
                write!(f, "rate {pair} changed from {old} to {new}")
            }
            Self::ShutDown => write!(f, "engine shut down"),
        }
    }
}
