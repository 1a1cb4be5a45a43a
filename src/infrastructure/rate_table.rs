use crate::domain::rate::{CurrencyPair, DEFAULT_RATE};
use crate::error::{BankError, Result};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Thread-safe exchange-rate map.
///
/// One table-wide lock is enough here: writes are infrequent and each read
/// copies a single value out, so readers never see a torn rate.
#[derive(Default)]
pub struct RateTable {
    rates: RwLock<HashMap<CurrencyPair, Decimal>>,
}

impl RateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rate for `pair`; unseeded pairs read as [`DEFAULT_RATE`].
    pub fn get(&self, pair: &CurrencyPair) -> Decimal {
        self.rates.read().get(pair).copied().unwrap_or(DEFAULT_RATE)
    }

    /// Replaces the rate for `pair`, rejecting non-positive values.
    pub fn set(&self, pair: CurrencyPair, rate: Decimal) -> Result<()> {
        if rate <= Decimal::ZERO {
            return Err(BankError::NonPositiveRate(rate));
        }
        self.rates.write().insert(pair, rate);
        Ok(())
    }

    /// Seeded pairs in a stable order, for one updater pass.
    pub fn pairs(&self) -> Vec<CurrencyPair> {
        let mut pairs: Vec<CurrencyPair> = self.rates.read().keys().cloned().collect();
        pairs.sort();
        pairs
    }
}
