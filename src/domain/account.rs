use crate::error::BankError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, Sub, SubAssign};

/// Stable account identifier, assigned by the caller at creation time.
pub type AccountId = u32;

/// Currency code an account is denominated in, e.g. "USD".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Currency(String);

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a positive monetary amount for transactions.
///
/// Ensures that transaction amounts are always positive; requests carrying
/// other values are rejected before any balance is touched.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, BankError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::NonPositiveAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

/// Running balance of an account.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Addition that reports overflow instead of panicking.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single ledger entry.
///
/// Only mutated while the owning ledger holds this account's lock, so the
/// methods here can assume exclusive access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Caller-assigned unique identifier.
    pub id: AccountId,
    /// Current funds; never negative after a committed operation.
    pub balance: Balance,
    /// Currency the balance is denominated in.
    pub currency: Currency,
}

impl Account {
    pub fn new(id: AccountId, balance: Balance, currency: Currency) -> Self {
        Self {
            id,
            balance,
            currency,
        }
    }

    /// Adds funds, declining a sum the balance cannot represent.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), BankError> {
        self.balance = self
            .balance
            .checked_add(amount.into())
            .ok_or(BankError::BalanceOverflow {
                account: self.id,
                amount: amount.value(),
            })?;
        Ok(())
    }

    /// Removes funds if covered, otherwise declines without touching the balance.
    pub fn withdraw(&mut self, amount: Amount) -> Result<(), BankError> {
        let requested = Balance::from(amount);
        if self.balance >= requested {
            self.balance -= requested;
            Ok(())
        } else {
            Err(BankError::InsufficientFunds {
                account: self.id,
                balance: self.balance.0,
                requested: amount.value(),
            })
        }
    }
}
