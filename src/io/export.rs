use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Amount, Transaction, WriterSink};

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub balance: Amount,
    /// Most-recent-first, like the statement
    pub transactions: Vec<Transaction>,
}

/// Output format for a statement export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Table => "table",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ExportFormat::Table),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Invalid format '{}'. Valid formats: table, csv, json",
                s
            )),
        }
    }
}

/// Exporter for writing a ledger's statement in various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Write the statement in the given format. Returns the number of
    /// transactions written.
    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Table => self.write_table(writer),
            ExportFormat::Csv => self.write_csv(writer),
            ExportFormat::Json => self.write_json(writer).map(|s| s.transactions.len()),
        }
    }

    /// Write the plain-text statement
    pub fn write_table<W: Write>(&self, writer: W) -> Result<usize> {
        let statement = self.service.statement()?;
        let mut sink = WriterSink::new(writer);
        statement.write_to(&mut sink)?;
        sink.into_inner().flush()?;
        Ok(statement.lines.len())
    }

    /// Write the statement as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.transactions()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["date", "kind", "amount", "balance"])?;

        for tx in &transactions {
            csv_writer.write_record([
                tx.formatted_date(),
                tx.kind.as_str().to_string(),
                tx.signed_amount().to_string(),
                tx.balance_after.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Write the ledger as a JSON snapshot
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let (balance, transactions) = self.service.snapshot()?;
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            balance,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}
