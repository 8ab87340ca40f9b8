pub mod export;
pub mod import;

pub use export::{ExportFormat, Exporter, LedgerSnapshot};
pub use import::{ImportError, ImportResult, Importer};
