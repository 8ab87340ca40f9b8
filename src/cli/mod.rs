use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{stdin, stdout, Read, Write};
use tracing::info;

use crate::application::LedgerService;
use crate::domain::{Amount, TransactionKind, WriterSink};
use crate::io::{ExportFormat, Exporter, Importer};
use crate::telemetry::{self, LogFormat};

/// Tally - single-account ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Record dated deposits and withdrawals and print an account statement")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the sample scenario (two deposits, one withdrawal) and print the statement
    Demo,

    /// Replay an operation script and print the resulting statement
    Run {
        /// Starting balance of the account
        #[arg(short = 'b', long, default_value_t = 0, allow_hyphen_values = true)]
        initial_balance: Amount,

        /// CSV script with columns kind,amount,date (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format: table, csv, json
        #[arg(short, long, default_value = "table")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Fail without writing output if any operation is rejected
        #[arg(long)]
        strict: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        telemetry::init(self.verbose, self.log_format);

        match self.command {
            Commands::Demo => run_demo_command(&DEMO_STEPS, stdout().lock()),

            Commands::Run {
                initial_balance,
                input,
                format,
                output,
                strict,
            } => run_script_command(
                initial_balance,
                input.as_deref(),
                format,
                output.as_deref(),
                strict,
            ),
        }
    }
}

/// One step of the sample scenario.
struct DemoStep {
    kind: TransactionKind,
    amount: Amount,
    date: (i32, u32, u32),
}

const DEMO_STEPS: [DemoStep; 3] = [
    DemoStep {
        kind: TransactionKind::Deposit,
        amount: 1000,
        date: (2012, 1, 10),
    },
    DemoStep {
        kind: TransactionKind::Deposit,
        amount: 2000,
        date: (2012, 1, 13),
    },
    DemoStep {
        kind: TransactionKind::Withdraw,
        amount: 500,
        date: (2012, 1, 14),
    },
];

fn run_demo_command<W: Write>(steps: &[DemoStep], mut writer: W) -> Result<()> {
    let service = LedgerService::new(0);

    for step in steps {
        let (year, month, day) = step.date;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("Invalid demo date {}-{}-{}", year, month, day))?;

        // A rejected step is reported and the scenario carries on.
        if let Err(e) = service.apply(step.kind, step.amount, date) {
            writeln!(writer, "Error: {}", e)?;
        }
    }

    let mut sink = WriterSink::new(writer);
    service.print_statement(&mut sink)?;
    sink.into_inner().flush()?;
    Ok(())
}

fn run_script_command(
    initial_balance: Amount,
    input: Option<&str>,
    format: ExportFormat,
    output: Option<&str>,
    strict: bool,
) -> Result<()> {
    let service = LedgerService::new(initial_balance);

    // Determine input reader
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = Importer::new(&service).replay_csv(reader)?;

    if !result.is_clean() {
        eprintln!("Rejected operations:");
        for error in &result.errors {
            eprintln!("  {}", error);
        }
        if strict {
            anyhow::bail!(
                "{} operation(s) rejected; statement not written",
                result.errors.len()
            );
        }
    }

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = Exporter::new(&service).export(format, writer)?;
    info!(
        applied = result.applied,
        rejected = result.errors.len(),
        written = count,
        format = format.as_str(),
        "statement written"
    );
    if let Some(path) = output {
        eprintln!("Exported {} transactions to {}", count, path);
    }

    Ok(())
}
