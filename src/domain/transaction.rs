use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Amount;

/// Display format for transaction dates: zero-padded `DD-MM-YYYY`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming into the account
    Deposit,
    /// Money leaving the account
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Some(TransactionKind::Deposit),
            "withdraw" | "withdrawal" => Some(TransactionKind::Withdraw),
            _ => None,
        }
    }

    /// Noun used in user-facing messages ("Deposit", "Withdrawal").
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single balance-affecting event. Transactions are immutable once
/// recorded; the ledger only ever adds new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date the transaction is booked on
    pub date: NaiveDate,
    /// Magnitude of the movement (always positive)
    pub amount: Amount,
    /// Account balance right after this transaction was applied
    pub balance_after: Amount,
    pub kind: TransactionKind,
}

impl Transaction {
    /// Build a transaction. Only the ledger calls this, after validating the
    /// amount, so a non-positive amount here is a programming error.
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Amount,
        balance_after: Amount,
        date: NaiveDate,
    ) -> Self {
        assert!(amount > 0, "Transaction amount must be positive");
        Self {
            date,
            amount,
            balance_after,
            kind,
        }
    }

    /// Date rendered as `DD-MM-YYYY`.
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Amount with direction applied: positive for deposits, negative for
    /// withdrawals.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Withdraw => -self.amount,
        }
    }

    pub fn is_deposit(&self) -> bool {
        self.kind == TransactionKind::Deposit
    }
}
