use crate::domain::account::Currency;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

/// Ordered currency pair: "USD_EUR" and "EUR_USD" are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyPair {
    pub from: Currency,
    pub to: Currency,
}

impl CurrencyPair {
    pub fn new(from: impl Into<Currency>, to: impl Into<Currency>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.from, self.to)
    }
}

/// Fallback returned for pairs that were never seeded.
pub const DEFAULT_RATE: Decimal = Decimal::ONE;

/// Smallest value a drifting rate can reach.
pub const MIN_RATE: Decimal = dec!(0.0001);

/// One drift step moves a rate by at most one percent either way.
const MAX_DRIFT_BPS: i64 = 100;

/// Applies one random drift step to `rate`, keeping the result positive.
///
/// The step is uniform in [-1%, +1%] of the current value, drawn in whole
/// basis points so the decimal arithmetic stays exact.
pub fn drift<R: Rng>(rate: Decimal, rng: &mut R) -> Decimal {
    let bps = rng.gen_range(-MAX_DRIFT_BPS..=MAX_DRIFT_BPS);
    let delta = Decimal::new(bps, 4);
    (rate + rate * delta).max(MIN_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pair_direction_is_significant() {
        let usd_eur = CurrencyPair::new("USD", "EUR");
        let eur_usd = CurrencyPair::new("EUR", "USD");
        assert_ne!(usd_eur, eur_usd);
        assert_eq!(usd_eur.to_string(), "USD_EUR");
    }

    #[test]
    fn test_drift_stays_within_one_percent() {
        let mut rng = StdRng::seed_from_u64(7);
        let rate = dec!(0.92);
        for _ in 0..500 {
            let next = drift(rate, &mut rng);
            assert!(next >= rate * dec!(0.99), "drifted below -1%: {next}");
            assert!(next <= rate * dec!(1.01), "drifted above +1%: {next}");
        }
    }

    #[test]
    fn test_drift_keeps_small_rates_positive() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut rate = MIN_RATE;
        for _ in 0..100 {
            rate = drift(rate, &mut rng);
            assert!(rate >= MIN_RATE);
        }
    }
}
