use crate::domain::account::{Account, AccountId, Amount, Balance, Currency};
use crate::error::{BankError, Result};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Thread-safe account store with per-account locking.
///
/// The outer map is locked only to look up or insert account slots; every
/// balance mutation happens under the per-account mutex, so operations on
/// distinct accounts proceed in parallel. Two-account operations take the
/// locks in ascending id order, which rules out lock-order deadlock.
#[derive(Default)]
pub struct Ledger {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<Account>>>>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account. The id must be unused and the opening
    /// balance non-negative.
    pub fn create_account(
        &self,
        id: AccountId,
        opening: Decimal,
        currency: Currency,
    ) -> Result<()> {
        if opening < Decimal::ZERO {
            return Err(BankError::NegativeOpeningBalance(opening));
        }
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&id) {
            return Err(BankError::AccountAlreadyExists(id));
        }
        let account = Account::new(id, Balance::new(opening), currency);
        accounts.insert(id, Arc::new(Mutex::new(account)));
        Ok(())
    }

    fn slot(&self, id: AccountId) -> Result<Arc<Mutex<Account>>> {
        self.accounts
            .read()
            .get(&id)
            .cloned()
            .ok_or(BankError::AccountNotFound(id))
    }

    /// Adds funds and returns the new balance.
    pub fn deposit(&self, id: AccountId, amount: Amount) -> Result<Balance> {
        let slot = self.slot(id)?;
        let mut account = slot.lock();
        account.deposit(amount)?;
        Ok(account.balance)
    }

    /// Removes funds and returns the new balance; a shortfall declines
    /// without touching the balance.
    pub fn withdraw(&self, id: AccountId, amount: Amount) -> Result<Balance> {
        let slot = self.slot(id)?;
        let mut account = slot.lock();
        account.withdraw(amount)?;
        Ok(account.balance)
    }

    /// Moves funds between two accounts as one atomic step: both balances
    /// change or neither does. Both accounts must hold the same currency.
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(Balance, Balance)> {
        let from_slot = self.slot(from)?;
        let to_slot = self.slot(to)?;

        // A self-transfer would deadlock on its own lock; it nets to zero,
        // so only the funds check applies.
        if from == to {
            let mut account = from_slot.lock();
            account.withdraw(amount)?;
            account.deposit(amount)?;
            return Ok((account.balance, account.balance));
        }

        // Lock in ascending id order regardless of direction so opposing
        // transfers on the same pair cannot deadlock.
        let (mut from_account, mut to_account);
        if from < to {
            from_account = from_slot.lock();
            to_account = to_slot.lock();
        } else {
            to_account = to_slot.lock();
            from_account = from_slot.lock();
        }

        if from_account.currency != to_account.currency {
            return Err(BankError::CurrencyMismatch {
                account: to,
                expected: from_account.currency.clone(),
                actual: to_account.currency.clone(),
            });
        }
        // The credit must be proven to fit before the debit commits.
        to_account
            .balance
            .checked_add(amount.into())
            .ok_or(BankError::BalanceOverflow {
                account: to,
                amount: amount.value(),
            })?;
        from_account.withdraw(amount)?;
        to_account.deposit(amount)?;
        Ok((from_account.balance, to_account.balance))
    }

    /// Converts funds into `to` at `rate` inside one critical section:
    /// currency check, withdrawal, converted deposit, and the currency
    /// switch are never observable separately.
    ///
    /// Returns the converted amount and the new balance.
    pub fn exchange(
        &self,
        id: AccountId,
        amount: Amount,
        from: &Currency,
        to: Currency,
        rate: Decimal,
    ) -> Result<(Decimal, Balance)> {
        let slot = self.slot(id)?;
        let mut account = slot.lock();
        if account.currency != *from {
            return Err(BankError::CurrencyMismatch {
                account: id,
                expected: from.clone(),
                actual: account.currency.clone(),
            });
        }
        // Validate everything before the first mutation. The headroom
        // check runs against the pre-withdrawal balance, which is at
        // least as strict as the final sum.
        let converted = Amount::new(amount.value() * rate)?;
        account
            .balance
            .checked_add(converted.into())
            .ok_or(BankError::BalanceOverflow {
                account: id,
                amount: converted.value(),
            })?;
        account.withdraw(amount)?;
        account.deposit(converted)?;
        account.currency = to;
        Ok((converted.value(), account.balance))
    }

    pub fn balance(&self, id: AccountId) -> Result<Balance> {
        Ok(self.slot(id)?.lock().balance)
    }

    pub fn currency(&self, id: AccountId) -> Result<Currency> {
        Ok(self.slot(id)?.lock().currency.clone())
    }

    pub fn set_currency(&self, id: AccountId, currency: Currency) -> Result<()> {
        self.slot(id)?.lock().currency = currency;
        Ok(())
    }

    /// Point-in-time copy of every account, ordered by id.
    ///
    /// Each account is read under its own lock; the snapshot is consistent
    /// per account, not across accounts.
    pub fn snapshot(&self) -> Vec<Account> {
        let accounts = self.accounts.read();
        let mut all: Vec<Account> = accounts.values().map(|slot| slot.lock().clone()).collect();
        all.sort_by_key(|account| account.id);
        all
    }
}
