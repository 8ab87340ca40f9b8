use thiserror::Error;

use super::{Amount, TransactionKind};

/// Why the ledger refused an operation. The ledger is left untouched whenever
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{} amount must be positive", .kind.label())]
    InvalidAmount { kind: TransactionKind, amount: Amount },

    #[error("Insufficient balance")]
    InsufficientFunds { balance: Amount, requested: Amount },

    #[error("Balance overflow")]
    BalanceOverflow { balance: Amount, amount: Amount },
}
