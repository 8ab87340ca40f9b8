use std::collections::VecDeque;

use chrono::{Local, NaiveDate};

use super::{Amount, LedgerError, Statement, StatementSink, Transaction, TransactionKind};

/// A single account: a running balance plus the history of every deposit and
/// withdrawal applied to it.
///
/// History is kept most-recent-first. New transactions go to the front and
/// nothing is ever removed or edited, so `balance_after` on each entry stays
/// the balance the account had at that moment.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balance: Amount,
    history: VecDeque<Transaction>,
}

impl Ledger {
    /// Open a ledger with the given starting balance. Any value is accepted,
    /// including a negative one.
    pub fn new(initial_balance: Amount) -> Self {
        Self {
            balance: initial_balance,
            history: VecDeque::new(),
        }
    }

    /// Deposit `amount` booked on `date`.
    pub fn deposit(&mut self, amount: Amount, date: NaiveDate) -> Result<(), LedgerError> {
        self.record_deposit(amount, date).map(|_| ())
    }

    fn record_deposit(
        &mut self,
        amount: Amount,
        date: NaiveDate,
    ) -> Result<&Transaction, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount {
                kind: TransactionKind::Deposit,
                amount,
            });
        }

        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;

        Ok(self.record(TransactionKind::Deposit, amount, balance, date))
    }

    /// Deposit `amount` booked on today's local date.
    pub fn deposit_today(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.deposit(amount, today())
    }

    /// Withdraw `amount` booked on `date`. Taking out exactly the whole
    /// balance is allowed; going below it is not.
    pub fn withdraw(&mut self, amount: Amount, date: NaiveDate) -> Result<(), LedgerError> {
        self.record_withdrawal(amount, date).map(|_| ())
    }

    fn record_withdrawal(
        &mut self,
        amount: Amount,
        date: NaiveDate,
    ) -> Result<&Transaction, LedgerError> {
        // Amount is validated before funds so a bad amount always reports as such.
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount {
                kind: TransactionKind::Withdraw,
                amount,
            });
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }

        let balance = self.balance - amount;
        Ok(self.record(TransactionKind::Withdraw, amount, balance, date))
    }

    /// Withdraw `amount` booked on today's local date.
    pub fn withdraw_today(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.withdraw(amount, today())
    }

    /// Apply an operation of the given kind and return the transaction it
    /// recorded. Convenience for callers that carry the kind as data.
    pub fn apply(
        &mut self,
        kind: TransactionKind,
        amount: Amount,
        date: NaiveDate,
    ) -> Result<&Transaction, LedgerError> {
        match kind {
            TransactionKind::Deposit => self.record_deposit(amount, date),
            TransactionKind::Withdraw => self.record_withdrawal(amount, date),
        }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Copy of the history, most-recent-first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.history.iter().cloned().collect()
    }

    /// The most recently recorded transaction, if any.
    pub fn latest(&self) -> Option<&Transaction> {
        self.history.front()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Build the statement for the current history.
    pub fn statement(&self) -> Statement {
        Statement::from_history(self.history.iter())
    }

    /// Render the statement and hand it to `sink` line by line.
    pub fn print_statement<S>(&self, sink: &mut S) -> std::io::Result<()>
    where
        S: StatementSink + ?Sized,
    {
        self.statement().write_to(sink)
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        amount: Amount,
        balance: Amount,
        date: NaiveDate,
    ) -> &Transaction {
        self.balance = balance;
        self.history.push_front(Transaction::new(kind, amount, balance, date));
        &self.history[0]
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::new(500);
        assert_eq!(ledger.balance(), 500);
        assert!(ledger.is_empty());
        assert!(ledger.latest().is_none());

        assert_eq!(Ledger::default().balance(), 0);
    }

    #[test]
    fn test_negative_initial_balance_is_accepted() {
        let ledger = Ledger::new(-250);
        assert_eq!(ledger.balance(), -250);
    }

    #[test]
    fn test_deposit_records_transaction() {
        let mut ledger = Ledger::new(0);
        ledger.deposit(500, date(2023, 5, 15)).unwrap();

        assert_eq!(ledger.balance(), 500);
        let tx = ledger.latest().unwrap();
        assert_eq!(tx.kind, TransactionKind::Deposit);
        assert_eq!(tx.amount, 500);
        assert_eq!(tx.balance_after, 500);
        assert_eq!(tx.formatted_date(), "15-05-2023");
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut ledger = Ledger::new(0);

        for amount in [0, -100] {
            let err = ledger.deposit(amount, date(2023, 1, 1)).unwrap_err();
            assert_eq!(err.to_string(), "Deposit amount must be positive");
        }
        assert_eq!(ledger.balance(), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_deposit_overflow_leaves_state_unchanged() {
        let mut ledger = Ledger::new(Amount::MAX - 10);
        let err = ledger.deposit(11, date(2023, 1, 1)).unwrap_err();

        assert!(matches!(err, LedgerError::BalanceOverflow { .. }));
        assert_eq!(ledger.balance(), Amount::MAX - 10);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_withdraw_records_transaction() {
        let mut ledger = Ledger::new(0);
        ledger.deposit(1000, date(2023, 1, 1)).unwrap();
        ledger.withdraw(300, date(2023, 1, 2)).unwrap();

        assert_eq!(ledger.balance(), 700);
        let tx = ledger.latest().unwrap();
        assert_eq!(tx.kind, TransactionKind::Withdraw);
        assert_eq!(tx.amount, 300);
        assert_eq!(tx.balance_after, 700);
        assert_eq!(tx.formatted_date(), "02-01-2023");
    }

    #[test]
    fn test_withdraw_whole_balance() {
        let mut ledger = Ledger::new(100);
        ledger.withdraw(100, date(2023, 1, 1)).unwrap();
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_withdraw_insufficient_balance() {
        let mut ledger = Ledger::new(100);
        let err = ledger.withdraw(200, date(2023, 1, 1)).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                balance: 100,
                requested: 200
            }
        );
        assert_eq!(err.to_string(), "Insufficient balance");
        assert_eq!(ledger.balance(), 100);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_withdraw_amount_checked_before_funds() {
        // Balance is zero, so funds would also be insufficient.
        let mut ledger = Ledger::new(0);
        let err = ledger.withdraw(-5, date(2023, 1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Withdrawal amount must be positive");
    }

    #[test]
    fn test_withdraw_from_negative_balance_is_refused() {
        let mut ledger = Ledger::new(-10);
        let err = ledger.withdraw(1, date(2023, 1, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut ledger = Ledger::new(0);
        ledger.deposit(1000, date(2023, 1, 1)).unwrap();
        ledger.deposit(2000, date(2023, 1, 2)).unwrap();
        ledger.withdraw(500, date(2023, 1, 3)).unwrap();
        ledger.withdraw(300, date(2023, 1, 4)).unwrap();

        assert_eq!(ledger.balance(), 2200);
        let balances: Vec<Amount> = ledger
            .transactions()
            .iter()
            .map(|tx| tx.balance_after)
            .collect();
        assert_eq!(balances, vec![2200, 2500, 3000, 1000]);
    }

    #[test]
    fn test_apply_dispatches_on_kind() {
        let mut ledger = Ledger::new(0);
        let tx = ledger
            .apply(TransactionKind::Deposit, 40, date(2023, 1, 1))
            .unwrap();
        assert_eq!(tx.balance_after, 40);
        let tx = ledger
            .apply(TransactionKind::Withdraw, 15, date(2023, 1, 2))
            .unwrap();
        assert_eq!(tx.signed_amount(), -15);
        assert_eq!(ledger.balance(), 25);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_today_overloads_use_current_date() {
        let mut ledger = Ledger::new(0);
        let before = Local::now().date_naive();
        ledger.deposit_today(1000).unwrap();
        ledger.withdraw_today(300).unwrap();
        let after = Local::now().date_naive();

        assert_eq!(ledger.balance(), 700);
        for tx in ledger.transactions() {
            assert!(tx.date >= before && tx.date <= after);
        }
    }
}
