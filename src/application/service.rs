use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{Amount, Ledger, Statement, StatementSink, Transaction, TransactionKind};

use super::AppError;

/// Application service around a single ledger.
/// This is the primary interface for any client (CLI, importer, tests).
///
/// The ledger sits behind one mutex, so each deposit, withdrawal or
/// statement runs as a single unit even when the service is shared between
/// threads.
pub struct LedgerService {
    ledger: Mutex<Ledger>,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(0)
    }
}

impl LedgerService {
    /// Create a service over a fresh ledger with the given starting balance.
    pub fn new(initial_balance: Amount) -> Self {
        debug!(initial_balance, "opening ledger");
        Self::from_ledger(Ledger::new(initial_balance))
    }

    /// Wrap an existing ledger.
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    /// Take the ledger back out of the service.
    pub fn into_ledger(self) -> Result<Ledger, AppError> {
        self.ledger.into_inner().map_err(|_| AppError::LockPoisoned)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, AppError> {
        self.ledger.lock().map_err(|_| AppError::LockPoisoned)
    }

    // ========================
    // Mutations
    // ========================

    /// Record a deposit. Returns the recorded transaction.
    pub fn deposit(&self, amount: Amount, date: NaiveDate) -> Result<Transaction, AppError> {
        self.apply(TransactionKind::Deposit, amount, date)
    }

    /// Record a withdrawal. Returns the recorded transaction.
    pub fn withdraw(&self, amount: Amount, date: NaiveDate) -> Result<Transaction, AppError> {
        self.apply(TransactionKind::Withdraw, amount, date)
    }

    /// Record an operation of the given kind.
    pub fn apply(
        &self,
        kind: TransactionKind,
        amount: Amount,
        date: NaiveDate,
    ) -> Result<Transaction, AppError> {
        let mut ledger = self.lock()?;

        match ledger.apply(kind, amount, date).cloned() {
            Ok(recorded) => {
                info!(
                    kind = %kind,
                    amount,
                    date = %recorded.formatted_date(),
                    balance = recorded.balance_after,
                    "transaction recorded"
                );
                Ok(recorded)
            }
            Err(err) => {
                warn!(
                    kind = %kind,
                    amount,
                    balance = ledger.balance(),
                    error = %err,
                    "transaction rejected"
                );
                Err(err.into())
            }
        }
    }

    // ========================
    // Queries
    // ========================

    pub fn balance(&self) -> Result<Amount, AppError> {
        Ok(self.lock()?.balance())
    }

    /// Copy of the history, most-recent-first.
    pub fn transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.lock()?.transactions())
    }

    /// Balance and history read under one lock, so they always agree.
    pub fn snapshot(&self) -> Result<(Amount, Vec<Transaction>), AppError> {
        let ledger = self.lock()?;
        Ok((ledger.balance(), ledger.transactions()))
    }

    pub fn statement(&self) -> Result<Statement, AppError> {
        let ledger = self.lock()?;
        debug!(rows = ledger.len(), "rendering statement");
        Ok(ledger.statement())
    }

    /// Write the statement to `sink` while holding the ledger lock, so no
    /// other operation can interleave with the output.
    pub fn print_statement<S>(&self, sink: &mut S) -> Result<(), AppError>
    where
        S: StatementSink + ?Sized,
    {
        let ledger = self.lock()?;
        debug!(rows = ledger.len(), "printing statement");
        ledger.print_statement(sink)?;
        Ok(())
    }
}
