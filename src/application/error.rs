use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Ledger lock poisoned: a previous operation panicked mid-update")]
    LockPoisoned,

    #[error("Failed to write statement: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// The ledger rule that was violated, if this is a ledger rejection.
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        match self {
            AppError::Ledger(err) => Some(err),
            _ => None,
        }
    }
}
