// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use chrono::NaiveDate;
use tally::domain::Ledger;

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the sample account from the statement walkthrough
pub struct SampleAccount;

impl SampleAccount {
    /// Deposit 1000 and 2000, then withdraw 500, all in January 2012
    pub fn ledger() -> Ledger {
        let mut ledger = Ledger::new(0);
        ledger.deposit(1000, parse_date("2012-01-10")).unwrap();
        ledger.deposit(2000, parse_date("2012-01-13")).unwrap();
        ledger.withdraw(500, parse_date("2012-01-14")).unwrap();
        ledger
    }

    /// The same operations as an operation script
    pub fn script() -> &'static str {
        "kind,amount,date\n\
         deposit,1000,2012-01-10\n\
         deposit,2000,2012-01-13\n\
         withdraw,500,2012-01-14\n"
    }
}
