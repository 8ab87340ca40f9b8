use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::Transaction;

pub const STATEMENT_HEADER: &str = "Date       || Amount || Balance";

/// Something that can receive a statement one line at a time (stdout, a log,
/// a buffer in a test).
pub trait StatementSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Collects lines in memory.
impl StatementSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Adapts any `io::Write` (stdout, a file) into a sink, one `\n`-terminated
/// line per call.
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> StatementSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{}", line)
    }
}

/// One rendered row of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub date: String,
    pub amount: String,
    pub balance: String,
}

impl StatementLine {
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            date: tx.formatted_date(),
            amount: tx.signed_amount().to_string(),
            balance: tx.balance_after.to_string(),
        }
    }
}

impl fmt::Display for StatementLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} || {} || {}", self.date, self.amount, self.balance)
    }
}

/// Human-readable rendering of a ledger's history, in the ledger's order
/// (most-recent-first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub lines: Vec<StatementLine>,
}

impl Statement {
    pub fn from_history<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self {
            lines: history
                .into_iter()
                .map(StatementLine::from_transaction)
                .collect(),
        }
    }

    /// Header followed by every row, already formatted.
    pub fn rendered_lines(&self) -> Vec<String> {
        std::iter::once(STATEMENT_HEADER.to_string())
            .chain(self.lines.iter().map(|line| line.to_string()))
            .collect()
    }

    pub fn write_to<S: StatementSink + ?Sized>(&self, sink: &mut S) -> io::Result<()> {
        sink.write_line(STATEMENT_HEADER)?;
        for line in &self.lines {
            sink.write_line(&line.to_string())?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", STATEMENT_HEADER)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
