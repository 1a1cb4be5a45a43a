use crate::domain::account::{AccountId, Currency};
use rust_decimal::Decimal;
use std::fmt;

/// One unit of work for the processing pool.
///
/// Amounts travel as raw decimals; validation happens when a worker applies
/// the request, so a bad amount surfaces as a declined event rather than a
/// submit-time failure.
#[derive(Debug, PartialEq, Clone)]
pub enum TransactionRequest {
    Deposit {
        account: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account: AccountId,
        amount: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
    Exchange {
        account: AccountId,
        amount: Decimal,
        from_currency: Currency,
        to_currency: Currency,
    },
}

impl fmt::Display for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit { account, amount } => {
                write!(f, "deposit of {amount} into account {account}")
            }
            Self::Withdraw { account, amount } => {
                write!(f, "withdrawal of {amount} from account {account}")
            }
            Self::Transfer { from, to, amount } => {
                write!(f, "transfer of {amount} from account {from} to account {to}")
            }
            Self::Exchange {
                account,
                amount,
                from_currency,
                to_currency,
            } => {
                write!(
                    f,
                    "exchange of {amount} {from_currency} to {to_currency} for account {account}"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_display() {
        let deposit = TransactionRequest::Deposit {
            account: 1,
            amount: dec!(50),
        };
        assert_eq!(deposit.to_string(), "deposit of 50 into account 1");

        let exchange = TransactionRequest::Exchange {
            account: 2,
            amount: dec!(30),
            from_currency: Currency::from("USD"),
            to_currency: Currency::from("EUR"),
        };
        assert_eq!(
            exchange.to_string(),
            "exchange of 30 USD to EUR for account 2"
        );
    }
}
