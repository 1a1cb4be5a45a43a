use crate::domain::account::{AccountId, Currency};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by ledger, queue, and engine operations.
///
/// Insufficient funds and currency mismatches are ordinary declined
/// outcomes once a worker handles them, but synchronous callers receive
/// them as typed errors, so every failure lives in the one enum.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BankError {
    #[error("Account {0} already exists")]
    AccountAlreadyExists(AccountId),
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Opening balance must not be negative, got {0}")]
    NegativeOpeningBalance(Decimal),
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Account {account} holds {actual}, operation requires {expected}")]
    CurrencyMismatch {
        account: AccountId,
        expected: Currency,
        actual: Currency,
    },
    #[error("Account {account} balance cannot hold {amount} more")]
    BalanceOverflow { account: AccountId, amount: Decimal },
    #[error("Exchange rate must be positive, got {0}")]
    NonPositiveRate(Decimal),
    #[error("Engine is already started")]
    AlreadyStarted,
    #[error("Engine is shut down")]
    ShutDown,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T, E = BankError> = std::result::Result<T, E>;
