use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::io::Read;
use tracing::{debug, warn};

use crate::application::LedgerService;
use crate::domain::{parse_amount, TransactionKind, DATE_FORMAT};

/// Result of replaying an operation script
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub applied: usize,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Error that occurred on one line of the script
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "line {} ({}): {}", self.line, field, self.error),
            None => write!(f, "line {}: {}", self.line, self.error),
        }
    }
}

/// Replays deposits and withdrawals from a CSV script into a ledger.
///
/// The script has a header row and the columns `kind,amount,date`. The date
/// column may be left empty (or omitted) to book on the default date.
pub struct Importer<'a> {
    service: &'a LedgerService,
    default_date: NaiveDate,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self {
            service,
            default_date: Local::now().date_naive(),
        }
    }

    /// Date used for rows without one. Defaults to today.
    pub fn with_default_date(mut self, date: NaiveDate) -> Self {
        self.default_date = date;
        self
    }

    /// Apply every row in order. Rows that fail to parse, or that the ledger
    /// rejects, are collected as errors and the replay carries on.
    pub fn replay_csv<R: Read>(&self, reader: R) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut result = ImportResult::default();

        // Without the expected header the first operation would be read as
        // column names and lost, so nothing is applied.
        let headers = csv_reader.headers()?;
        if headers.is_empty() {
            return Ok(result);
        }
        if !is_script_header(headers) {
            let found: Vec<&str> = headers.iter().collect();
            warn!(header = %found.join(","), "script header not recognized");
            result.errors.push(ImportError {
                line: 1,
                field: None,
                error: format!(
                    "Expected header 'kind,amount,date', found '{}'",
                    found.join(",")
                ),
            });
            return Ok(result);
        }

        for (line_num, record) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let kind_str = record.get(0).unwrap_or("");
            let amount_str = record.get(1).unwrap_or("");
            let date_str = record.get(2).unwrap_or("");

            let Some(kind) = TransactionKind::from_str(kind_str) else {
                result.errors.push(ImportError {
                    line,
                    field: Some("kind".to_string()),
                    error: format!("Unknown operation '{}'. Use deposit or withdraw", kind_str),
                });
                continue;
            };

            let amount = match parse_amount(amount_str) {
                Ok(a) => a,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount: {}", e),
                    });
                    continue;
                }
            };

            let date = if date_str.is_empty() {
                self.default_date
            } else {
                match parse_date(date_str) {
                    Ok(d) => d,
                    Err(e) => {
                        result.errors.push(ImportError {
                            line,
                            field: Some("date".to_string()),
                            error: e.to_string(),
                        });
                        continue;
                    }
                }
            };

            match self.service.apply(kind, amount, date) {
                Ok(_) => result.applied += 1,
                Err(e) => {
                    warn!(line, error = %e, "script operation rejected");
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: e.to_string(),
                    });
                }
            }
        }

        debug!(
            applied = result.applied,
            errors = result.errors.len(),
            "script replay finished"
        );
        Ok(result)
    }
}

/// The first columns must be `kind,amount` optionally followed by `date`,
/// in any letter case.
fn is_script_header(headers: &csv::StringRecord) -> bool {
    let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    match names.as_slice() {
        [kind, amount] => kind == "kind" && amount == "amount",
        [kind, amount, date, ..] => kind == "kind" && amount == "amount" && date == "date",
        _ => false,
    }
}

/// Parse a booking date. Accepts ISO `YYYY-MM-DD` and the statement's own
/// `DD-MM-YYYY`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2012, 1, 14).unwrap();
        assert_eq!(parse_date("2012-01-14").unwrap(), expected);
        assert_eq!(parse_date("14-01-2012").unwrap(), expected);
        assert!(parse_date("2012/01/14").is_err());
        assert!(parse_date("2023-02-30").is_err());
    }

    #[test]
    fn test_script_header_recognition() {
        let header = |fields: &[&str]| csv::StringRecord::from(fields.to_vec());

        assert!(is_script_header(&header(&["kind", "amount", "date"])));
        assert!(is_script_header(&header(&[" Kind ", "AMOUNT", "Date"])));
        assert!(is_script_header(&header(&["kind", "amount"])));
        assert!(!is_script_header(&header(&["deposit", "1000", "2012-01-10"])));
        assert!(!is_script_header(&header(&["amount", "kind", "date"])));
        assert!(!is_script_header(&header(&["kind"])));
    }

    #[test]
    fn test_import_error_display() {
        let err = ImportError {
            line: 3,
            field: Some("amount".to_string()),
            error: "Invalid amount".to_string(),
        };
        assert_eq!(err.to_string(), "line 3 (amount): Invalid amount");
    }
}
